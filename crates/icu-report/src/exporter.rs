//! Report exporter: fetches a report artifact and hands it to the download port.

use crate::download::{DownloadArtifact, FileDownloadPort};
use crate::error::{ExportError, Result};
use crate::format::ReportFormat;
use crate::service::{ReportRequest, ReportService};
use chrono::{DateTime, Utc};
use icu_check::CheckResult;
use icu_core::InputKind;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Prefix of every saved report file name.
pub const REPORT_FILE_PREFIX: &str = "icu-privacy-report";

/// Name for a report generated at `at`: `icu-privacy-report-<unix-millis>.<ext>`.
#[must_use]
pub fn report_filename(format: ReportFormat, at: DateTime<Utc>) -> String {
    format!(
        "{REPORT_FILE_PREFIX}-{}.{}",
        at.timestamp_millis(),
        format.extension()
    )
}

/// Where a finished export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReceipt {
    /// Format of the saved report
    pub format: ReportFormat,
    /// File name the artifact was offered under
    pub filename: String,
    /// Location reported by the download port
    pub location: String,
    /// Artifact size in bytes
    pub bytes: usize,
}

/// What a call to [`ReportExporter::export_report`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The report was generated and saved
    Downloaded(DownloadReceipt),
    /// An export in the same format was already running; nothing was sent
    AlreadyInFlight,
}

/// Generates reports for check results and saves them through a [`FileDownloadPort`].
///
/// Exports are guarded per format: a second request for a format that is
/// still being exported is dropped, while other formats proceed.
pub struct ReportExporter {
    service: Arc<dyn ReportService>,
    port: Arc<dyn FileDownloadPort>,
    in_flight: Mutex<HashSet<ReportFormat>>,
}

impl ReportExporter {
    /// Create an exporter over a report service and a download port.
    #[must_use]
    pub fn new(service: Arc<dyn ReportService>, port: Arc<dyn FileDownloadPort>) -> Self {
        Self {
            service,
            port,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Export a report from caller-supplied strings.
    ///
    /// Fails before any network call when there is no result or `format` is
    /// not `pdf`/`html`.
    ///
    /// # Errors
    /// Returns [`ExportError::NoResults`], [`ExportError::UnsupportedFormat`],
    /// [`ExportError::ReportGeneration`] or a download error.
    pub async fn export_report(
        &self,
        results: Option<&CheckResult>,
        format: &str,
        kind: InputKind,
        value: &str,
    ) -> Result<ExportOutcome> {
        let results = results.ok_or(ExportError::NoResults)?;
        let format: ReportFormat = format.parse()?;
        self.export(results, format, kind, value).await
    }

    /// Export a report in an already-parsed format.
    ///
    /// Each successful call produces a new file.
    pub async fn export(
        &self,
        results: &CheckResult,
        format: ReportFormat,
        kind: InputKind,
        value: &str,
    ) -> Result<ExportOutcome> {
        let Some(_slot) = FormatSlot::claim(&self.in_flight, format) else {
            tracing::warn!("Ignoring {} export: one is already in flight", format.label());
            return Ok(ExportOutcome::AlreadyInFlight);
        };

        let request = ReportRequest {
            results,
            format,
            input_type: kind,
            input_value: value,
        };

        tracing::debug!("Requesting {} report for {} check", format.label(), kind);
        let bytes = self.service.generate(&request).await.map_err(|e| {
            tracing::warn!("{} report generation failed: {}", format.label(), e);
            e
        })?;

        let artifact = DownloadArtifact {
            suggested_filename: report_filename(format, Utc::now()),
            bytes,
        };
        let receipt = self.save(format, &artifact).await?;

        tracing::info!(
            "{} report saved to {} ({} bytes)",
            format.label(),
            receipt.location,
            receipt.bytes
        );
        Ok(ExportOutcome::Downloaded(receipt))
    }

    /// Stage, trigger and always release.
    async fn save(
        &self,
        format: ReportFormat,
        artifact: &DownloadArtifact,
    ) -> Result<DownloadReceipt> {
        let handle = self.port.stage(artifact).await?;
        let triggered = self.port.trigger(&handle).await;
        self.port.release(handle).await;

        let location = triggered.map_err(|e| {
            tracing::warn!("Saving {} failed: {}", artifact.suggested_filename, e);
            e
        })?;

        Ok(DownloadReceipt {
            format,
            filename: artifact.suggested_filename.clone(),
            location,
            bytes: artifact.bytes.len(),
        })
    }
}

/// Claim on one format's export slot, given back on drop.
struct FormatSlot<'a> {
    in_flight: &'a Mutex<HashSet<ReportFormat>>,
    format: ReportFormat,
}

impl<'a> FormatSlot<'a> {
    fn claim(in_flight: &'a Mutex<HashSet<ReportFormat>>, format: ReportFormat) -> Option<Self> {
        // The set guard must be gone before a slot can exist: its drop relocks.
        let inserted = lock(in_flight).insert(format);
        inserted.then(|| Self { in_flight, format })
    }
}

impl Drop for FormatSlot<'_> {
    fn drop(&mut self) {
        lock(self.in_flight).remove(&self.format);
    }
}

fn lock(set: &Mutex<HashSet<ReportFormat>>) -> MutexGuard<'_, HashSet<ReportFormat>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}
