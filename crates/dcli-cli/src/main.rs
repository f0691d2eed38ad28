//! dcli - terminal dashboard for a local container engine

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dcli_config::GlobalConfig;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "dcli")]
#[command(author, version, about = "Terminal dashboard for Docker containers, images, networks, volumes and stacks", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine socket path or URL (overrides the config file)
    #[arg(long, global = true)]
    socket: Option<String>,

    /// Write logs to this file (overrides the config file)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit global configuration
    Config {
        /// Open config in editor
        #[arg(short, long)]
        edit: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = GlobalConfig::load()?;
    if let Some(socket) = cli.socket {
        config.engine.socket = socket;
    }
    if let Some(path) = cli.log_file {
        config.logging.file = Some(path);
    }

    init_logging(cli.verbose, &config)?;

    if let Some(Commands::Config { edit }) = cli.command {
        return commands::config(&config, edit);
    }

    let engine = dcli_engine::create_engine(&config).await?;
    tracing::info!("Connected to container engine");

    dcli_tui::run(Arc::new(engine), &config).await?;
    Ok(())
}

fn init_logging(verbose: bool, config: &GlobalConfig) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    match config.logging.file {
        Some(ref path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(stderr_unless_dashboard),
                )
                .init();
        }
    }

    Ok(())
}

/// Stderr, or a sink while the dashboard is drawing
fn stderr_unless_dashboard() -> Box<dyn io::Write> {
    if dcli_tui::owns_terminal() {
        Box::new(io::sink())
    } else {
        Box::new(io::stderr())
    }
}
