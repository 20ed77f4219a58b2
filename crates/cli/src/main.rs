//! Developer tool for the scenario framework.
//!
//! Run with: `cargo run -p discen-cli -- <command>`

mod commands;
mod dirs;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Inspect, Simulate, Train};
use discen_runtime::RuntimeConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Inspect scenarios, train goals and play simulations
#[derive(Parser)]
#[command(name = "discen")]
#[command(about = "Digital scenario framework tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory for relative paths (overrides DISCEN_PROJECT_DIR)
    #[arg(short, long, global = true, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// Also write logs to the platform log directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Load a scenario document and print its contents
    Inspect(Inspect),

    /// Train a goal over a digital system
    Train(Train),

    /// Play a simulation timeline against a scenario
    Simulate(Simulate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for DISCEN_* variables)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file)?;

    let mut config = RuntimeConfig::from_env();
    if let Some(dir) = cli.project_dir {
        config.project_dir = dir;
    }

    match cli.command {
        Command::Inspect(cmd) => cmd.execute(config),
        Command::Train(cmd) => cmd.execute(config),
        Command::Simulate(cmd) => cmd.execute(config),
    }
}

/// Logs go to stderr, and to `discen.log` in the log directory when asked.
/// The returned guard flushes the file writer on drop.
fn setup_logging(log_file: bool) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if !log_file {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let log_dir = dirs::log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "discen.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/discen.log", log_dir.display());
    Ok(Some(guard))
}
