//! Score interpretation: mapping an exposure score to a risk band.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lowest valid exposure score.
pub const MIN_SCORE: i64 = 0;

/// Highest valid exposure score.
pub const MAX_SCORE: i64 = 100;

/// Scores at or above this are at least [`RiskBand::Medium`].
pub const MEDIUM_THRESHOLD: u8 = 30;

/// Scores at or above this are [`RiskBand::High`].
pub const HIGH_THRESHOLD: u8 = 60;

/// Coarse classification of an exposure score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    /// Score below 30
    Low,
    /// Score from 30 up to 59
    Medium,
    /// Score of 60 or more
    High,
}

impl RiskBand {
    /// Band for a score already known to be in range.
    #[must_use]
    pub(crate) fn for_score(score: u8) -> Self {
        if score < MEDIUM_THRESHOLD {
            Self::Low
        } else if score < HIGH_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Display label, e.g. `"Medium Risk"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A score fell outside `0..=100`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("score {score} is outside the valid range 0-100")]
pub struct ScoreRangeError {
    /// The offending score
    pub score: i64,
}

/// Ensure a raw score is within `0..=100`, narrowing it to `u8`.
pub fn checked_score(score: i64) -> Result<u8, ScoreRangeError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        u8::try_from(score).map_err(|_| ScoreRangeError { score })
    } else {
        Err(ScoreRangeError { score })
    }
}

/// Classify an exposure score.
///
/// Out-of-range scores are rejected rather than clamped.
///
/// # Errors
/// Returns [`ScoreRangeError`] if `score < 0` or `score > 100`.
pub fn classify(score: i64) -> Result<RiskBand, ScoreRangeError> {
    checked_score(score).map(RiskBand::for_score)
}
