//! HealthSwap CLI -- score products and find healthier alternatives
//!
//! The binary is a thin host around `healthswap-engine`: it reads product
//! records from JSON files, resolves `healthswap.toml`, and renders engine
//! results as text or JSON.

mod cli;
mod commands;
mod error;
mod input;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::input::load_config;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let config_path = cli.config.as_deref();

    // `config` reports its own load errors
    if let Commands::Config(args) = cli.command {
        return commands::config::execute(args, config_path, &writer).await;
    }

    let loaded = load_config(config_path).await?;
    logging::init_tracing(&loaded.config.general, cli.log_level.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;
    healthswap_core::metrics::describe_all();
    tracing::debug!(source = %loaded.source(), "configuration loaded");

    let config = &loaded.config;
    match cli.command {
        Commands::Score(args) => commands::score::execute(args, config, &writer).await,
        Commands::Quantity(args) => commands::quantity::execute(args, config, &writer),
        Commands::Terms(args) => commands::terms::execute(args, &writer),
        Commands::Compare(args) => commands::compare::execute(args, config, &writer).await,
        Commands::Alternatives(args) => {
            commands::alternatives::execute(args, config, &writer).await
        }
        Commands::Trend(args) => commands::trend::execute(args, config, &writer).await,
        Commands::Config(_) => Ok(()),
    }
}
