//! OrganizeMe task service library.
//!
//! Exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod query;
pub mod server;
pub mod service;
pub mod types;
