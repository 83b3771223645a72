//! ICU Report - report export for privacy exposure checks.
//!
//! Turns an accepted [`CheckResult`](icu_check::CheckResult) into a
//! downloaded report file. The report itself is rendered by a remote
//! service; this crate validates the request, fetches the artifact and hands
//! it to a [`FileDownloadPort`].
//!
//! # Example
//!
//! ```rust,no_run
//! use icu_report::{ExportOutcome, FsDownloadPort, HttpReportService, ReportExporter};
//! use icu_check::CheckResult;
//! use icu_core::InputKind;
//! use std::sync::Arc;
//!
//! # async fn example(result: CheckResult) -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = ReportExporter::new(
//!     Arc::new(HttpReportService::new("http://localhost:8001")?),
//!     Arc::new(FsDownloadPort::new("/tmp/reports")),
//! );
//!
//! if let ExportOutcome::Downloaded(receipt) = exporter
//!     .export_report(Some(&result), "pdf", InputKind::Email, "someone@example.com")
//!     .await?
//! {
//!     println!("saved {}", receipt.location);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod download;
pub mod error;
pub mod exporter;
pub mod format;
pub mod notices;
pub mod service;

// Re-export commonly used types
pub use download::{DownloadArtifact, DownloadHandle, FileDownloadPort, FsDownloadPort};
pub use error::{ExportError, Result};
pub use exporter::{report_filename, DownloadReceipt, ExportOutcome, ReportExporter};
pub use format::ReportFormat;
pub use service::{HttpReportService, ReportRequest, ReportService};
