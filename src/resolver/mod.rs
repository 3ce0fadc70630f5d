//! Source dispatch: normalizes heterogeneous file sources into [`ResolvedFile`].
//!
//! The resolver is the crate's entry point. It dispatches on a closed
//! [`FileSource`] variant, delegates remote sources to the
//! [`RemoteFetcher`](crate::fetch::RemoteFetcher), and produces either a
//! normalized file value or a structured error. Fetch-failure detail is
//! logged here and collapsed into [`ResolveError::InvalidFilePath`]; callers
//! see a single "could not obtain file" signal.
//!
//! # Example
//!
//! ```no_run
//! use filestage::fetch::FetchOptions;
//! use filestage::resolver::{FileResolver, FileSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = FileResolver::new(FetchOptions::default());
//! let source = FileSource::from_path_or_url("https://example.com/photo.jpg");
//! let file = resolver.resolve(source, None).await?;
//! println!("{} staged at {:?}", file.file_name(), file.path());
//! # Ok(())
//! # }
//! ```

mod error;
mod file;

pub use error::ResolveError;
pub use file::ResolvedFile;

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::fetch::{FetchOptions, RemoteFetcher};
use crate::filename::{base_name, file_name_from_url, sanitize_file_name};
use crate::mime;
use crate::staging::stage_path;

/// A file source awaiting normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A remote HTTP(S) URL to download.
    Remote {
        /// The URL to fetch.
        url: String,
    },
    /// An existing local filesystem path.
    Local {
        /// The path to the file.
        path: PathBuf,
    },
    /// An in-memory payload with a caller-asserted name.
    Binary {
        /// The logical file name.
        file_name: String,
        /// The payload.
        bytes: Vec<u8>,
    },
    /// An upload descriptor: caller-asserted name plus an already-staged path.
    Upload {
        /// The logical file name asserted by the upload handler.
        file_name: String,
        /// The staged path handed off by the upload handler.
        path: PathBuf,
    },
}

impl FileSource {
    /// Boundary adapter for raw string inputs.
    ///
    /// Anything with an HTTP(S) scheme prefix routes to [`FileSource::Remote`];
    /// everything else is treated as a local path. An HTTP-prefixed input is
    /// never treated as a local path, even if a file of that exact name
    /// exists on disk.
    #[must_use]
    pub fn from_path_or_url(input: &str) -> Self {
        if input.starts_with("http") {
            Self::Remote {
                url: input.to_string(),
            }
        } else {
            Self::Local {
                path: PathBuf::from(input),
            }
        }
    }

    /// Source kind label for logging.
    fn kind(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Local { .. } => "local",
            Self::Binary { .. } => "binary",
            Self::Upload { .. } => "upload",
        }
    }
}

/// Per-call overrides supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ResolveScope {
    /// Overrides the logical file name derived from the source.
    pub attachment_name: Option<String>,
}

/// Entry point: dispatches on source kind and produces the normalized value.
#[derive(Debug, Clone)]
pub struct FileResolver {
    fetcher: RemoteFetcher,
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new(FetchOptions::default())
    }
}

impl FileResolver {
    /// Creates a resolver whose remote path uses the given fetch options.
    #[must_use]
    pub fn new(options: FetchOptions) -> Self {
        Self {
            fetcher: RemoteFetcher::new(options),
        }
    }

    /// Resolves a source into a normalized file value.
    ///
    /// The logical file name comes from `scope.attachment_name` when
    /// supplied, else from the source itself (URL basename, path basename,
    /// or the caller-asserted name).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidFilePath`] when a local path does not
    /// exist or a remote fetch fails for any reason, and
    /// [`ResolveError::IoWrite`] when staging downloaded bytes to disk fails.
    #[instrument(skip_all, fields(kind = source.kind()))]
    pub async fn resolve(
        &self,
        source: FileSource,
        scope: Option<&ResolveScope>,
    ) -> Result<ResolvedFile, ResolveError> {
        let attachment_name = scope.and_then(|s| s.attachment_name.as_deref());
        match source {
            FileSource::Remote { url } => self.resolve_remote(&url, attachment_name).await,
            FileSource::Local { path } => resolve_local(path, attachment_name),
            FileSource::Binary { file_name, bytes } => {
                Ok(resolve_binary(&file_name, bytes, attachment_name))
            }
            FileSource::Upload { file_name, path } => {
                resolve_upload(&file_name, path, attachment_name)
            }
        }
    }

    async fn resolve_remote(
        &self,
        url: &str,
        attachment_name: Option<&str>,
    ) -> Result<ResolvedFile, ResolveError> {
        let outcome = match self.fetcher.fetch(url).await {
            Ok(outcome) => outcome,
            Err(error) => {
                // Detail stays in the logs; the caller contract is a single
                // "could not obtain file" signal.
                warn!(url = %url, error = %error, "remote fetch failed");
                return Err(ResolveError::invalid_file_path(url));
            }
        };

        let file_name = attachment_name
            .map(sanitize_file_name)
            .unwrap_or_else(|| file_name_from_url(&outcome.final_url));

        let staged = stage_path(Some(&file_name));
        if let Err(error) = tokio::fs::write(&staged, &outcome.body).await {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(ResolveError::io_write(staged, error));
        }

        info!(
            url = %url,
            final_url = %outcome.final_url,
            path = %staged.display(),
            bytes = outcome.body.len(),
            "remote file staged"
        );
        Ok(ResolvedFile::from_path(staged, file_name, outcome.mime_type))
    }
}

fn resolve_local(
    path: PathBuf,
    attachment_name: Option<&str>,
) -> Result<ResolvedFile, ResolveError> {
    if !path.exists() {
        return Err(ResolveError::invalid_file_path(path.display().to_string()));
    }

    let file_name = attachment_name.map_or_else(
        || {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| crate::filename::FALLBACK_FILE_NAME.to_string())
        },
        sanitize_file_name,
    );
    let mime_type = mime::from_path(&path.to_string_lossy()).to_string();
    Ok(ResolvedFile::from_path(path, file_name, mime_type))
}

fn resolve_binary(file_name: &str, bytes: Vec<u8>, attachment_name: Option<&str>) -> ResolvedFile {
    let logical_name = sanitize_file_name(attachment_name.unwrap_or_else(|| base_name(file_name)));
    let mime_type = mime::from_path(file_name).to_string();
    ResolvedFile::from_binary(logical_name, bytes, mime_type)
}

fn resolve_upload(
    file_name: &str,
    path: PathBuf,
    attachment_name: Option<&str>,
) -> Result<ResolvedFile, ResolveError> {
    if !path.exists() {
        return Err(ResolveError::invalid_file_path(path.display().to_string()));
    }

    let logical_name = sanitize_file_name(attachment_name.unwrap_or_else(|| base_name(file_name)));
    // The staged path may carry a generic or missing extension; the
    // caller-asserted name is the trustworthy one for MIME purposes.
    let mime_type = mime::from_path(file_name).to_string();
    Ok(ResolvedFile::from_path(path, logical_name, mime_type))
}
