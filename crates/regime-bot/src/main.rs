//! Market regime monitor - Entry Point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

/// Market regime monitor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via REGIME_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Command {
    /// Fetch all indicators once and print them as JSON
    Snapshot,
    /// Evaluate both switch directions once
    Check,
    /// Poll market conditions and switch modes until Ctrl-C
    #[default]
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    regime_telemetry::init_logging("info,regime=debug")?;

    info!("Starting regime-bot v{}", env!("CARGO_PKG_VERSION"));

    let config = regime_bot::AppConfig::load(args.config.as_deref())?;
    info!(
        policy = ?config.monitor.policy,
        initial_mode = %config.initial_mode,
        "Configuration loaded"
    );

    let app = regime_bot::Application::new(config)?;

    match args.command.unwrap_or_default() {
        Command::Snapshot => {
            let snapshot = app.snapshot().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Check => {
            let (bull, conservative) = app.check().await;
            println!("to bull:         {} ({})", bull.should_switch, bull.reason);
            println!(
                "to conservative: {} ({})",
                conservative.should_switch, conservative.reason
            );
        }
        Command::Run => app.run().await?,
    }

    Ok(())
}
