//! Error types for the fetch module.
//!
//! These errors are internal to the acquisition layer: the file resolver
//! collapses them into its own taxonomy at the boundary, after logging the
//! detail they carry.

use thiserror::Error;

/// Errors that can occur while fetching a remote file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connect/receive timeout persisted through the whole retry budget.
    #[error("timeout fetching {url} after {attempts} attempts")]
    Timeout {
        /// The URL that timed out.
        url: String,
        /// Total requests issued (initial attempt plus retries).
        attempts: u32,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Terminal response with a status other than 200 or 302.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Redirect chain exceeded the configured hop limit.
    #[error("too many redirects fetching {url} (limit {limit})")]
    TooManyRedirects {
        /// The URL the fetch started from.
        url: String,
        /// The configured hop limit.
        limit: u32,
    },

    /// The provided or redirected-to URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl FetchError {
    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>, attempts: u32) -> Self {
        Self::Timeout {
            url: url.into(),
            attempts,
        }
    }

    /// Creates a network error from a transport error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a redirect-limit error.
    pub fn too_many_redirects(url: impl Into<String>, limit: u32) -> Self {
        Self::TooManyRedirects {
            url: url.into(),
            limit,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}
