//! # CLI Error Type
//!
//! Everything that can stop the CLI from printing a quote. The pricing
//! engine itself never fails; these errors come from reading input,
//! loading configuration, or strict validation.

use marquee_core::ValidationError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input file or stdin, or writing stdout, failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not valid JSON, or the output could not be encoded.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read or is invalid.
    #[error("Failed to load config: {0}")]
    Config(String),

    /// Strict mode rejected a line item.
    #[error("Line {index} rejected: {source}")]
    Validation {
        index: usize,
        source: ValidationError,
    },

    /// The JSON is well formed but not a cart.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(err.to_string())
    }
}
