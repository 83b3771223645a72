//! Input normalization before a check is submitted.

use crate::error::{CheckError, Result};
use crate::types::CheckRequest;
use icu_core::{InputKind, ValidationConfig};
use regex::Regex;
use std::sync::OnceLock;

const USERNAME_MIN_CHARS: usize = 2;
const USERNAME_MAX_CHARS: usize = 50;

/// Trim `raw` and reject empty input.
///
/// No per-kind syntax is checked; any non-empty trimmed value is returned
/// unchanged.
///
/// # Errors
/// Returns [`CheckError::EmptyInput`] if nothing but whitespace was given.
pub fn validate(kind: InputKind, raw: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CheckError::EmptyInput { kind });
    }
    Ok(value.to_string())
}

/// Validator applied by the controller before any network call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputValidator {
    strict_syntax: bool,
}

impl InputValidator {
    /// Validator with the minimal contract: trim and reject empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator that also enforces per-kind syntax rules.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_syntax: true,
        }
    }

    /// Build a validator from configuration.
    #[must_use]
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            strict_syntax: config.strict_syntax,
        }
    }

    /// Whether per-kind syntax rules are enforced.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict_syntax
    }

    /// Normalize `raw` for the given kind.
    ///
    /// # Errors
    /// Returns [`CheckError::EmptyInput`] for blank input, and
    /// [`CheckError::InvalidFormat`] in strict mode when the value does not
    /// look like the selected kind.
    pub fn validate(&self, kind: InputKind, raw: &str) -> Result<String> {
        let value = validate(kind, raw)?;
        if self.strict_syntax {
            check_syntax(kind, &value)?;
        }
        Ok(value)
    }

    /// Validate and wrap the value in a [`CheckRequest`].
    pub fn request(&self, kind: InputKind, raw: &str) -> Result<CheckRequest> {
        self.validate(kind, raw)
            .map(|value| CheckRequest::new(kind, value))
    }
}

fn check_syntax(kind: InputKind, value: &str) -> Result<()> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    static DOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();

    let invalid = |reason: &str| CheckError::InvalidFormat {
        kind,
        reason: reason.to_string(),
    };

    match kind {
        InputKind::Email => {
            let regex = EMAIL_REGEX.get_or_init(|| {
                Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                    .expect("valid regex")
            });
            if !regex.is_match(value) {
                return Err(invalid("expected an address like name@example.com"));
            }
        }
        InputKind::Username => {
            let regex = USERNAME_REGEX
                .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("valid regex"));
            let len = value.chars().count();
            if !regex.is_match(value) || !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len)
            {
                return Err(invalid(
                    "2-50 characters, alphanumeric with '.', '_' and '-' allowed",
                ));
            }
        }
        InputKind::Domain => {
            let regex = DOMAIN_REGEX.get_or_init(|| {
                Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
            });
            if !regex.is_match(value) {
                return Err(invalid("expected a name like example.com"));
            }
        }
    }

    Ok(())
}
