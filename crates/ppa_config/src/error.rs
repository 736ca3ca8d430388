//! Error types for configuration loading and validation.

use ppa_common::SpaceError;

/// Errors that can occur when loading or validating a `ppa.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The sweep parameters do not form a valid space.
    #[error("invalid sweep: {0}")]
    InvalidSweep(#[from] SpaceError),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
