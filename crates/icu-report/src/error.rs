//! Error types for report export.

use thiserror::Error;

/// Errors that can occur while exporting a report.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Export requested before any check succeeded
    #[error("no check results to export, run a check first")]
    NoResults,

    /// Format other than pdf or html
    #[error("unsupported report format '{format}', expected pdf or html")]
    UnsupportedFormat {
        /// Requested format
        format: String,
    },

    /// Report service failed or was unreachable
    #[error("failed to generate report: {message}")]
    ReportGeneration {
        /// HTTP status code, when the service answered
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Saving the artifact failed
    #[error("download failed: {0}")]
    Download(String),

    /// I/O error while staging or saving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ExportError {
    /// Whether the error was raised locally before any network activity.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NoResults | Self::UnsupportedFormat { .. })
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
