//! File-save capability and its filesystem implementation.
//!
//! A download happens in three steps: the artifact is staged behind a
//! transient handle, the save is triggered, and the handle is released.
//! [`ReportExporter`](crate::ReportExporter) always releases, whether the
//! trigger succeeded or not.

use crate::error::{ExportError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Upper bound on `name-N.ext` candidates tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Binary report plus the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Artifact contents
    pub bytes: Vec<u8>,
    /// File name suggested to the save mechanism
    pub suggested_filename: String,
}

/// Opaque token for a staged artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DownloadHandle(Uuid);

impl DownloadHandle {
    /// Create a fresh handle.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DownloadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "download-{}", self.0)
    }
}

/// Platform capability for saving a downloaded artifact.
#[async_trait]
pub trait FileDownloadPort: Send + Sync {
    /// Expose the artifact behind a transient handle.
    async fn stage(&self, artifact: &DownloadArtifact) -> Result<DownloadHandle>;

    /// Save the staged artifact; returns where it ended up.
    async fn trigger(&self, handle: &DownloadHandle) -> Result<String>;

    /// Free the transient handle. Unknown handles are ignored.
    async fn release(&self, handle: DownloadHandle);
}

struct Staged {
    file: NamedTempFile,
    filename: String,
}

/// Saves artifacts into a directory on the local filesystem.
///
/// Artifacts are staged as temporary files inside the target directory and
/// renamed into place on trigger, so a failed save never leaves a partial
/// report behind. Existing files are never overwritten; a numeric suffix is
/// added instead.
///
/// File work runs on tokio's blocking pool. The staging map is only locked
/// to take entries in and out, never across I/O.
pub struct FsDownloadPort {
    dir: PathBuf,
    staged: Mutex<HashMap<DownloadHandle, Staged>>,
}

impl FsDownloadPort {
    /// Create a port saving into `dir`, created on first use.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            staged: Mutex::new(HashMap::new()),
        }
    }

    /// Directory downloads are saved into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of artifacts currently staged.
    #[must_use]
    pub fn staged_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DownloadHandle, Staged>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FileDownloadPort for FsDownloadPort {
    async fn stage(&self, artifact: &DownloadArtifact) -> Result<DownloadHandle> {
        let filename = safe_filename(&artifact.suggested_filename)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let dir = self.dir.clone();
        let bytes = artifact.bytes.clone();
        let file = tokio::task::spawn_blocking(move || write_staged(&dir, &bytes))
            .await
            .map_err(|e| ExportError::Internal(format!("staging task failed: {e}")))??;

        let handle = DownloadHandle::generate();
        tracing::debug!("Staged {} bytes as {}", artifact.bytes.len(), handle);
        self.lock().insert(handle, Staged { file, filename });
        Ok(handle)
    }

    async fn trigger(&self, handle: &DownloadHandle) -> Result<String> {
        let staged = self
            .lock()
            .remove(handle)
            .ok_or_else(|| ExportError::Download(format!("{handle} is not staged")))?;

        let dir = self.dir.clone();
        let (published, unsaved) = tokio::task::spawn_blocking(move || publish(&dir, staged))
            .await
            .map_err(|e| ExportError::Internal(format!("save task failed: {e}")))?;

        if let Some(staged) = unsaved {
            // Keep it staged so release still removes the temp file
            self.lock().insert(*handle, staged);
        }

        let path = published?;
        tracing::debug!("Saved {} to {}", handle, path.display());
        Ok(path.display().to_string())
    }

    async fn release(&self, handle: DownloadHandle) {
        let removed = self.lock().remove(&handle);
        let Some(staged) = removed else {
            tracing::debug!("Release of {} ignored: nothing staged", handle);
            return;
        };

        match tokio::task::spawn_blocking(move || staged.file.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Failed to remove staged file for {}: {}", handle, e),
            Err(e) => tracing::warn!("Cleanup task for {} failed: {}", handle, e),
        }
    }
}

/// Reject names that would escape the download directory.
fn safe_filename(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed == "."
        || trimmed == ".."
    {
        return Err(ExportError::Download(format!(
            "refusing to save under file name '{name}'"
        )));
    }
    Ok(trimmed.to_string())
}

/// Write `bytes` to a fresh temporary file inside `dir`.
fn write_staged(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    Ok(file)
}

/// `filename` for the first attempt, `stem-N.ext` after that.
fn candidate_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{attempt}.{ext}"),
        _ => format!("{filename}-{attempt}"),
    }
}

/// Atomically move the staged file to the first free name in `dir`.
///
/// On failure the staged entry is handed back untouched.
fn publish(dir: &Path, staged: Staged) -> (Result<PathBuf>, Option<Staged>) {
    let Staged { mut file, filename } = staged;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(candidate_name(&filename, attempt));
        match file.persist_noclobber(&path) {
            Ok(_) => return (Ok(path), None),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => file = e.file,
            Err(e) => {
                let staged = Staged {
                    file: e.file,
                    filename,
                };
                return (Err(e.error.into()), Some(staged));
            }
        }
    }

    let err = ExportError::Download(format!(
        "no free file name for '{filename}' in {}",
        dir.display()
    ));
    (Err(err), Some(Staged { file, filename }))
}
