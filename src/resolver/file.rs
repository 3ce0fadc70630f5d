//! The normalized file value and its materialization step.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::staging::stage_path;

use super::error::ResolveError;

/// A successfully acquired file, regardless of original source kind.
///
/// Exactly one of `path` and `binary` is the authoritative content source.
/// Binary-backed values become path-backed through
/// [`ensure_path`](Self::ensure_path); deletion of the staged file is the
/// downstream consumer's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    path: Option<PathBuf>,
    file_name: String,
    binary: Option<Vec<u8>>,
    mime_type: String,
}

impl ResolvedFile {
    /// Creates a path-backed value.
    #[must_use]
    pub fn from_path(path: PathBuf, file_name: String, mime_type: String) -> Self {
        Self {
            path: Some(path),
            file_name,
            binary: None,
            mime_type,
        }
    }

    /// Creates a binary-backed value; `path` stays unset until
    /// [`ensure_path`](Self::ensure_path) runs.
    #[must_use]
    pub fn from_binary(file_name: String, bytes: Vec<u8>, mime_type: String) -> Self {
        Self {
            path: None,
            file_name,
            binary: Some(bytes),
            mime_type,
        }
    }

    /// Local path where the bytes are staged, when path-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The logical display name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The in-memory payload, when binary-backed.
    #[must_use]
    pub fn binary(&self) -> Option<&[u8]> {
        self.binary.as_deref()
    }

    /// The resolved MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Materializes a binary-backed value to disk.
    ///
    /// Path-backed values pass through unchanged with no I/O, so the call is
    /// idempotent. Binary-backed values are written to a staged temp path
    /// (extension inferred from the file name); on success `path` becomes
    /// authoritative and `binary` is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::IoWrite`] if the disk write fails; the partial
    /// file is removed, so no half-written path is ever referenced.
    pub async fn ensure_path(self) -> Result<Self, ResolveError> {
        if self.path.is_some() {
            return Ok(self);
        }

        let bytes = self.binary.unwrap_or_default();
        let staged = stage_path(Some(&self.file_name));
        if let Err(error) = tokio::fs::write(&staged, &bytes).await {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(ResolveError::io_write(staged, error));
        }
        debug!(
            path = %staged.display(),
            bytes = bytes.len(),
            file_name = %self.file_name,
            "materialized binary payload"
        );

        Ok(Self {
            path: Some(staged),
            file_name: self.file_name,
            binary: None,
            mime_type: self.mime_type,
        })
    }
}
