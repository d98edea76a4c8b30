//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "organizeme", version, about = "OrganizeMe task service")]
pub struct Cli {
    /// Path to the config file (overrides discovery).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database file.
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Port for the HTTP API.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Logging destination: 0/off, 1/stdout, 2/stderr, or a file path.
    #[arg(long, default_value = "2")]
    pub log: String,

    /// Enable debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Run the overdue sweep for one user and print how many tasks moved.
    Sweep {
        /// The user whose collection to sweep.
        #[arg(long)]
        user: String,
    },
}
