//! Shared types used across the ICU Privacy Mirror crates.

use crate::error::IcuError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of identifier submitted for a privacy exposure check.
///
/// Serialized in lowercase (`"email"`, `"username"`, `"domain"`), which is
/// the form the analysis and report services expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Email address
    Email,
    /// Username on online platforms
    Username,
    /// Internet domain name
    Domain,
}

impl InputKind {
    /// All supported kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Email, Self::Username, Self::Domain];

    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
            Self::Domain => "domain",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = IcuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                IcuError::Validation(format!(
                    "unknown input kind '{wanted}', expected email, username or domain"
                ))
            })
    }
}

/// Visual weight of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    /// Informational notice
    Default,
    /// Failure notice
    Destructive,
}

/// Transient user-facing notification describing the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Short headline
    pub title: String,
    /// One-sentence description
    pub description: String,
    /// Visual weight
    pub variant: NoticeVariant,
}

impl Notice {
    /// Create an informational notice.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    /// Create a failure notice.
    #[must_use]
    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    /// Whether this notice reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
