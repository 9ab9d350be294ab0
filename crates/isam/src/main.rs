//! isam - declarative management of ISAM appliance configuration
//!
//! Main entry point for the isam CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, dsc};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// isam - declarative management of ISAM appliance configuration
#[derive(Parser)]
#[command(name = "isam")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the appliance config file
    #[arg(long, global = true, env = "ISAM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Appliance context to use (default: current-context)
    #[arg(long, global = true, env = "ISAM_CONTEXT")]
    pub context: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Distributed session cache policy
    Dsc(dsc::DscArgs),

    /// Appliance context management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "isam=debug,isam_client=debug,isam_config=debug,info"
    } else {
        "isam=info,isam_client=info,isam_config=info,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
                ),
        )
        .init();

    let ctx = commands::Context {
        config_path: cli.config,
        context: cli.context,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Dsc(args) => dsc::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
