//! OrganizeMe task service.
//!
//! A REST backend for a personal task manager: per-user task CRUD, the
//! overdue status sweep, and the read-side views the frontend renders.

use anyhow::Result;
use clap::Parser;
use organizeme::cli::{Cli, Command};
use organizeme::config::Config;
use organizeme::db::Database;
use organizeme::server;
use organizeme::service::{TaskService, UserContext};
use std::fs::OpenOptions;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    let mut config = Config::load(cli.config.as_deref())?;

    // Override settings from CLI arguments
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Command::Sweep { user }) => run_sweep(&config, &user),
        Some(Command::Serve) | None => run_server(config).await,
    }
}

/// Run the overdue sweep for one user from the command line.
fn run_sweep(config: &Config, user_id: &str) -> Result<()> {
    let db = Database::open(&config.server.db_path)?;
    let service = TaskService::new(db);
    let updated = service.sweep(&UserContext::new(user_id))?;
    println!("{} task(s) marked Not Finished", updated);
    Ok(())
}

/// Run the HTTP server until interrupted.
async fn run_server(config: Config) -> Result<()> {
    config.ensure_db_dir()?;

    info!(
        "Starting OrganizeMe task service v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Database: {:?}", config.server.db_path);

    let db = Database::open(&config.server.db_path)?;
    let service = TaskService::new(db);

    let (shutdown_tx, addr) = server::start_server(service, config.server.port).await?;
    info!("Server ready on {}", addr);

    tokio::signal::ctrl_c().await?;
    shutdown_tx.send(()).ok();

    Ok(())
}
