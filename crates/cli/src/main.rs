//! Evently CLI
//!
//! A command-line interface for moving event attachments to and from an
//! Evently backend.

mod commands;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use evently_ops::{OpsClient, OpsConfig};
use tracing_subscriber::{EnvFilter, fmt};

/// Evently CLI — upload, download and manage event attachments.
#[derive(Parser, Debug)]
#[command(name = "evently", version, about)]
struct Cli {
    /// Backend endpoint URL. Overrides the config file.
    #[arg(long, env = "EVENTLY_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Path to a TOML configuration file.
    #[arg(long, env = "EVENTLY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds. No timeout when unset.
    #[arg(long, env = "EVENTLY_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload files to an event.
    Upload(commands::upload::UploadArgs),
    /// Download an attachment.
    Download(commands::download::DownloadArgs),
    /// Show attachment metadata.
    Info(commands::info::InfoArgs),
    /// List the attachments of an event.
    List(commands::list::ListArgs),
    /// Delete an attachment.
    Delete(commands::delete::DeleteArgs),
}

fn load_config(cli: &Cli) -> anyhow::Result<OpsConfig> {
    let mut config = match cli.config {
        Some(ref path) => OpsConfig::load(path)?,
        None => OpsConfig::from_env(),
    };
    if let Some(ref endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli)?;
    tracing::debug!(endpoint = %config.endpoint, "using backend");
    let ops = OpsClient::from_config(&config)?;

    match cli.command {
        Command::Upload(args) => commands::upload::run(&ops, &args, &cli.format).await,
        Command::Download(args) => commands::download::run(&ops, &args, &cli.format).await,
        Command::Info(args) => commands::info::run(&ops, &args, &cli.format).await,
        Command::List(args) => commands::list::run(&ops, &args, &cli.format).await,
        Command::Delete(args) => commands::delete::run(&ops, &args, &cli.format).await,
    }
}
