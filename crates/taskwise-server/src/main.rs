//! Taskwise Server CLI
//!
//! Starts the HTTP server that turns free text into structured tasks.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use taskwise_server::{config::ServerConfig, start_server};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Taskwise server - natural-language task parsing over HTTP
#[derive(Debug, Parser)]
#[command(name = "taskwise-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TASKWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .map_err(taskwise_server::ServerError::from)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            warn!("No config file specified, using defaults (see --help)");
            ServerConfig::default()
        }
    };

    config.apply_env();
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.bind_port = port;
    }

    start_server(config).await?;

    Ok(())
}
