//! User-facing notices for check outcomes.

use crate::error::CheckError;
use crate::types::CheckResult;
use icu_core::Notice;

/// Notice shown when the input was blank.
#[must_use]
pub fn input_required() -> Notice {
    Notice::failure(
        "Input Required",
        "Please enter an email, username, or domain to check.",
    )
}

/// Notice shown after a successful check.
#[must_use]
pub fn check_complete(result: &CheckResult) -> Notice {
    Notice::info(
        "Privacy Check Complete",
        format!("Your privacy exposure score is {}/100", result.score()),
    )
}

/// Notice for a failed submission.
#[must_use]
pub fn check_failed(err: &CheckError) -> Notice {
    match err {
        CheckError::EmptyInput { .. } => input_required(),
        CheckError::InvalidFormat { .. } => Notice::failure("Invalid Input", err.to_string()),
        _ => Notice::failure("Check Failed", err.to_string()),
    }
}
