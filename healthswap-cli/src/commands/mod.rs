//! Command handlers -- one module per subcommand

pub mod alternatives;
pub mod compare;
pub mod config;
pub mod quantity;
pub mod score;
pub mod terms;
pub mod trend;

use healthswap_core::config::HealthswapConfig;
use healthswap_engine::{AlternativesEngine, EngineConfig, HttpCatalogClient};

use crate::error::CliError;

/// Build an engine backed by the HTTP catalog client from the effective configuration.
pub(crate) fn build_engine(
    config: &HealthswapConfig,
) -> Result<AlternativesEngine<HttpCatalogClient>, CliError> {
    Ok(AlternativesEngine::http(EngineConfig::from_core(config))?)
}
