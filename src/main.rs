//! # restock CLI
//!
//! LINE inventory bot: a weekly broadcast of the spreadsheet's re-order
//! list to configured groups, plus `!id` / `!help` chat commands.
//!
//! Usage:
//!   restock serve                      # Start the webhook gateway
//!   restock update                     # Run one inventory update now
//!   restock config show                # Show configuration

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use restock_channels::LineChannel;
use restock_core::{Messenger, RestockConfig};
use restock_gateway::AppState;
use restock_sheets::SheetsClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "restock",
    version,
    about = "LINE inventory bot — scheduled spreadsheet broadcasts with chat commands"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook gateway (and the scheduler, if auto_start is set)
    Serve {
        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one inventory update from the terminal
    Update,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Write a default config file to ~/.restock/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "restock=debug,tower_http=debug" } else { "restock=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let mut config = if let Some(path) = &cli.config {
        RestockConfig::load_from(std::path::Path::new(path))?
    } else {
        RestockConfig::load()?
    };

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }

            let state = Arc::new(build_state(config)?);
            if state.config.schedule.auto_start {
                tracing::info!("auto-starting weekly inventory schedule");
                state.start_inventory_schedule()?;
            }
            restock_gateway::serve(state).await?;
        }

        Commands::Update => {
            let state = build_state(config)?;
            let report = state.updater.run().await?;
            println!(
                "Inventory update sent: {} succeeded, {} failed",
                report.succeeded, report.failed
            );
            for entry in &report.per_target {
                println!("  {}: {:?}", entry.target, entry.outcome);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Init => {
                RestockConfig::default().save()?;
                println!("Config written to {}", RestockConfig::default_path().display());
            }
        },
    }

    Ok(())
}

fn build_state(config: RestockConfig) -> Result<AppState> {
    let line = Arc::new(LineChannel::new(config.line.clone()));
    let source = Arc::new(SheetsClient::new(config.sheets.clone())?);
    let messenger: Arc<dyn Messenger> = line.clone();
    Ok(AppState::new(config, line, messenger, source))
}
