//! Core error types for ICU Privacy Mirror.
//!
//! The check and report crates carry their own error enums. What lives here
//! covers configuration handling and the shared value types.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised by core operations.
#[derive(Error, Debug)]
pub enum IcuError {
    /// Configuration could not be loaded, saved or validated
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A value did not match any accepted spelling
    #[error("validation error: {0}")]
    Validation(String),

    /// Filesystem failure outside of config handling
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while locating, reading, writing or checking `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The platform exposes no home or config directory
    #[error("no configuration directory available for this user")]
    NoConfigDir,

    /// The file exists but is not valid TOML for [`AppConfig`](crate::AppConfig)
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// The in-memory config could not be rendered back to TOML
    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the file failed
    #[error("configuration I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A setting parsed but holds an unusable value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Dotted key of the offending setting
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, IcuError>;

/// Result alias for configuration handling.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
