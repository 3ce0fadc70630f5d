//! Error types for the file resolver.
//!
//! The resolver exposes a deliberately narrow taxonomy: every
//! source-acquisition failure collapses into [`ResolveError::InvalidFilePath`]
//! (detail lives in the logs), while staged-write failures stay distinct
//! because they point at the local environment, not the source.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving a file source.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The source could not be materialized into a usable local file.
    #[error("invalid file path: {input}")]
    InvalidFilePath {
        /// The path or URL that failed to resolve.
        input: String,
    },

    /// A staged disk write failed.
    #[error("IO error writing to {path}: {source}")]
    IoWrite {
        /// The staged path where the write failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Creates an invalid-file-path error.
    pub fn invalid_file_path(input: impl Into<String>) -> Self {
        Self::InvalidFilePath {
            input: input.into(),
        }
    }

    /// Creates a staged-write error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoWrite {
            path: path.into(),
            source,
        }
    }
}
