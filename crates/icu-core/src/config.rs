//! Configuration management for ICU Privacy Mirror.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Report formats accepted for `reports.default_format`.
const SUPPORTED_REPORT_FORMATS: [&str; 2] = ["pdf", "html"];

/// Main application configuration.
///
/// This is loaded from `~/.config/icu-privacy-mirror/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Analysis and report service settings
    pub backend: BackendConfig,
    /// Input validation settings
    pub validation: ValidationConfig,
    /// Report export settings
    pub reports: ReportsConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if it is missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `ICU_BACKEND_URL`: Override the service base URL
    /// - `ICU_TIMEOUT_SECS`: Override the request timeout
    /// - `ICU_DOWNLOAD_DIR`: Override the report download directory
    /// - `ICU_STRICT_VALIDATION`: Override strict input syntax checks (true/false)
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup function.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ICU_BACKEND_URL") {
            tracing::debug!("Override backend.base_url from env: {}", url);
            self.backend.base_url = url;
        }

        if let Some(val) = lookup("ICU_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.backend.timeout_secs = secs;
                tracing::debug!("Override backend.timeout_secs from env: {}", secs);
            }
        }

        if let Some(dir) = lookup("ICU_DOWNLOAD_DIR") {
            tracing::debug!("Override reports.download_dir from env: {}", dir);
            self.reports.download_dir = Some(PathBuf::from(dir));
        }

        if let Some(val) = lookup("ICU_STRICT_VALIDATION") {
            if let Ok(strict) = val.parse() {
                self.validation.strict_syntax = strict;
                tracing::debug!("Override validation.strict_syntax from env: {}", strict);
            }
        }
    }

    /// Check that the configuration values are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let format = self.reports.default_format.to_ascii_lowercase();
        if !SUPPORTED_REPORT_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "reports.default_format".to_string(),
                reason: format!("unsupported format '{}'", self.reports.default_format),
            });
        }

        Ok(())
    }

    /// Save configuration to an explicit path.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/icu-privacy-mirror/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/icu-privacy-mirror`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// Directory reports are saved into.
    ///
    /// Resolution order: configured `reports.download_dir`, the user's
    /// download directory, then `<data_dir>/reports`.
    pub fn download_dir(&self) -> ConfigResult<PathBuf> {
        if let Some(dir) = &self.reports.download_dir {
            return Ok(dir.clone());
        }

        let user_downloads = UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf));
        if let Some(dir) = user_downloads {
            return Ok(dir);
        }

        Ok(Self::data_dir()?.join("reports"))
    }
}

fn project_dirs() -> ConfigResult<ProjectDirs> {
    ProjectDirs::from("com", "icu", "icu-privacy-mirror").ok_or(ConfigError::NoConfigDir)
}

/// Analysis and report service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL both services are reached under
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl BackendConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_secs: 30,
            user_agent: format!("icu-privacy-mirror/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Input validation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Apply per-kind syntax rules (email, username, domain) before submitting
    pub strict_syntax: bool,
}

/// Report export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Directory reports are saved into (defaults to the user's download directory)
    pub download_dir: Option<PathBuf>,
    /// Format used when none is requested: "pdf" or "html"
    pub default_format: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            default_format: "pdf".to_string(),
        }
    }
}
