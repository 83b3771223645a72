//! Request and result types exchanged with the analysis service.

use crate::score::{checked_score, RiskBand, ScoreRangeError};
use icu_core::InputKind;
use serde::{Deserialize, Serialize};

/// A validated check request.
///
/// Only constructed through [`InputValidator`](crate::InputValidator), so the
/// value is always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    #[serde(rename = "type")]
    kind: InputKind,
    value: String,
}

impl CheckRequest {
    pub(crate) fn new(kind: InputKind, value: String) -> Self {
        Self { kind, value }
    }

    /// Kind of identifier being checked.
    #[must_use]
    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Normalized identifier.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Domain registration details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisInfo {
    /// Whether the domain is registered
    #[serde(default)]
    pub registered: bool,
    /// Registrar name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,
    /// Creation date as reported by WHOIS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
}

/// Raw analysis response as it arrives on the wire.
///
/// The score is kept wide so out-of-range values can be detected instead of
/// failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Exposure score, expected in `0..=100`
    pub score: i64,
    /// WHOIS findings (domain checks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois: Option<WhoisInfo>,
    /// Platforms where the username was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sherlock: Option<Vec<String>>,
    /// Services where the email is registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holehe: Option<Vec<String>>,
    /// Human-readable summary
    #[serde(default)]
    pub summary: String,
    /// Backend generation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// An accepted check result.
///
/// Immutable once received. The score is guaranteed to be in `0..=100`;
/// deserializing or converting anything else fails with [`ScoreRangeError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CheckResponse")]
pub struct CheckResult {
    score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    whois: Option<WhoisInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sherlock: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    holehe: Option<Vec<String>>,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<f64>,
}

impl CheckResult {
    /// Exposure score in `0..=100`.
    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Risk band, recomputed from the score on every call.
    #[must_use]
    pub fn risk_band(&self) -> RiskBand {
        RiskBand::for_score(self.score)
    }

    /// WHOIS findings, if the check covered a domain.
    #[must_use]
    pub fn whois(&self) -> Option<&WhoisInfo> {
        self.whois.as_ref()
    }

    /// Platforms where the username was found, in backend order.
    #[must_use]
    pub fn sherlock(&self) -> Option<&[String]> {
        self.sherlock.as_deref()
    }

    /// Services where the email is registered, in backend order.
    #[must_use]
    pub fn holehe(&self) -> Option<&[String]> {
        self.holehe.as_deref()
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Backend generation time.
    #[must_use]
    pub fn timestamp(&self) -> Option<f64> {
        self.timestamp
    }

    /// Total number of platform and service hits.
    #[must_use]
    pub fn platform_count(&self) -> usize {
        self.sherlock().map_or(0, <[String]>::len) + self.holehe().map_or(0, <[String]>::len)
    }

    /// No platform hits and no registered domain.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.platform_count() == 0 && !self.whois().is_some_and(|w| w.registered)
    }
}

impl TryFrom<CheckResponse> for CheckResult {
    type Error = ScoreRangeError;

    fn try_from(response: CheckResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            score: checked_score(response.score)?,
            whois: response.whois,
            sherlock: response.sherlock,
            holehe: response.holehe,
            summary: response.summary,
            timestamp: response.timestamp,
        })
    }
}
