//! User-facing notices for export outcomes.

use crate::error::ExportError;
use crate::format::ReportFormat;
use icu_core::Notice;

/// Notice shown after a report was saved.
#[must_use]
pub fn report_downloaded(format: ReportFormat) -> Notice {
    Notice::info(
        "Report Downloaded",
        format!("Your {} report has been downloaded.", format.label()),
    )
}

/// Notice shown when an export failed.
#[must_use]
pub fn download_failed(err: &ExportError) -> Notice {
    Notice::failure("Download Failed", err.to_string())
}
