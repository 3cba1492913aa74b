//! Spontaneity server binary
//!
//! Starts the HTTP service for recommendation generation and audit retrieval.

use clap::Parser;
use spontaneity_server::{config::ServerConfig, start_server, ServerError};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Spontaneity recommendation service
#[derive(Debug, Parser)]
#[command(name = "spontaneity-server", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "SPONTANEITY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = match cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => {
            eprintln!("Warning: No config file specified, using development configuration");
            eprintln!("Usage: spontaneity-server --config <path-to-config.toml>");
            eprintln!();
            ServerConfig::default_test_config()
        }
    };

    start_server(config).await
}
