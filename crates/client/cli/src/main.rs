//! Level generation simulator for registry content.
//!
//! Loads a data directory the way a host game would at startup, then plays the
//! per-level protocol against it: reset, fetch, count rooms, assign rooms.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use commands::{Check, Generate};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Simulate level generation against a content data directory
#[derive(Parser)]
#[command(name = "levelgen-cli")]
#[command(about = "Content registry simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding content.ron and an optional config.toml
    #[arg(long, env = "LEVELGEN_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Also write logs to levelgen.log in this directory
    #[arg(long, value_name = "DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Load the data directory and report what registered
    Check(Check),

    /// Run seeded levels and print what each one receives
    Generate(Generate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_dir.as_deref())?;

    match cli.command {
        Command::Check(cmd) => cmd.execute(&cli.data_dir),
        Command::Generate(cmd) => cmd.execute(&cli.data_dir),
    }
}

/// Setup logging to stderr and, when requested, to a file.
///
/// The returned guard flushes the file writer on drop.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, "levelgen.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/levelgen.log", dir.display());
    }
    Ok(guard)
}
