//! Input loading -- configuration resolution and JSON product/history files

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use healthswap_core::config::HealthswapConfig;
use healthswap_core::error::{HealthswapError, ParseError};
use healthswap_core::types::ProductRecord;
use healthswap_engine::ScanHistoryEntry;

use crate::error::CliError;

/// Configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "healthswap.toml";

/// Maximum accepted size of a product or history JSON file (1 MiB).
pub const MAX_INPUT_BYTES: u64 = 1024 * 1024;

/// Effective configuration and where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: HealthswapConfig,
    /// File path, or `None` when built-in defaults were used.
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Human-readable source label.
    pub fn source(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "(defaults)".to_owned(), |p| p.display().to_string())
    }
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Without one, `healthswap.toml` in the working
/// directory is used if present; otherwise defaults plus environment overrides.
pub async fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, HealthswapError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            tokio::fs::try_exists(&default)
                .await
                .unwrap_or(false)
                .then_some(default)
        }
    };

    let config = match &path {
        Some(path) => HealthswapConfig::load(path).await?,
        None => {
            debug!("no configuration file found, using defaults");
            let mut config = HealthswapConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            config
        }
    };

    Ok(LoadedConfig { config, path })
}

/// Read a product record JSON file.
pub async fn load_product(path: &Path) -> Result<ProductRecord, CliError> {
    read_json(path).await
}

/// Read a scan history JSON file (array of entries).
pub async fn load_history(path: &Path) -> Result<Vec<ScanHistoryEntry>, CliError> {
    read_json(path).await
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_INPUT_BYTES {
        return Err(HealthswapError::Parse(ParseError::TooLarge {
            size: usize::try_from(metadata.len()).unwrap_or(usize::MAX),
            max: usize::try_from(MAX_INPUT_BYTES).unwrap_or(usize::MAX),
        })
        .into());
    }

    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        HealthswapError::Parse(ParseError::ProductRecord(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}
