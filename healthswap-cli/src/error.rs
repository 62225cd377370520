//! CLI-specific error types and exit code mapping

use healthswap_core::error::HealthswapError;
use healthswap_engine::EngineError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Input file could not be interpreted (product record, history, quantity text).
    #[error("invalid input: {0}")]
    Input(String),

    /// Every catalog request failed for an `alternatives` run.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// JSON serialisation or parsing failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from healthswap-core.
    #[error("{0}")]
    Core(#[from] HealthswapError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                 |
    /// |------|-------------------------|
    /// | 0    | Success                 |
    /// | 1    | General / command error |
    /// | 2    | Configuration error     |
    /// | 3    | Catalog unavailable     |
    /// | 10   | IO error                |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::CatalogUnavailable(_) => 3,
            Self::Io(_) => 10,
            Self::Core(HealthswapError::Config(_)) => 2,
            Self::Core(HealthswapError::Io(_)) => 10,
            Self::Core(_) | Self::Json(_) | Self::Command(_) | Self::Input(_) => 1,
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Config { .. } => Self::Config(e.to_string()),
            _ => Self::Command(e.to_string()),
        }
    }
}
