//! codecheck - building-code compliance from the command line
//!
//! Runs the compliance workflow over a catalog file:
//! - `codecheck run --input params.json` prints the full workflow result
//! - `codecheck rules --jurisdiction NBC` lists the rules a jurisdiction sees

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::{RulesArgs, RunArgs};
use config::{CliConfig, LoggingConfig};

/// codecheck CLI
#[derive(Parser)]
#[command(name = "codecheck")]
#[command(about = "Building-code compliance checklists and layouts", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CODECHECK_CONFIG")]
    config: Option<String>,

    /// Log level or filter directive
    #[arg(long, env = "CODECHECK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "CODECHECK_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the compliance workflow on a parameter file
    Run(RunArgs),

    /// List the rules visible to a jurisdiction
    Rules(RulesArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config =
        CliConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }
    init_tracing(&config.logging);

    match cli.command {
        Commands::Run(args) => commands::run(&args, &config),
        Commands::Rules(args) => commands::rules(&args, &config),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());

    // Logs go to stderr; stdout carries command output.
    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
