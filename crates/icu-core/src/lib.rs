//! ICU Core - Foundation crate for the ICU Privacy Mirror client.
//!
//! This crate provides the shared types, error handling and configuration
//! management that the check and report crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared enums and values (`InputKind`, `Notice`)
//!
//! # Example
//!
//! ```rust
//! use icu_core::{AppConfig, InputKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.backend.timeout_secs, 30);
//!
//! let kind: InputKind = "email".parse()?;
//! assert_eq!(kind, InputKind::Email);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BackendConfig, ReportsConfig, ValidationConfig};
pub use error::{ConfigError, ConfigResult, IcuError, Result};
pub use types::{InputKind, Notice, NoticeVariant};
