//! MIME type determination from response headers and file extensions.
//!
//! Resolution is best-effort and never fails: unknown extensions fall back
//! to [`FALLBACK_MIME`]. Header-based resolution strips any parameters
//! (`charset=...`) from the `Content-Type` value.

use reqwest::header::{CONTENT_TYPE, HeaderMap};

use crate::filename::extension_of;

/// Fallback MIME type for unknown or absent extensions.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// MIME type from a `Content-Type` header: first `;`-segment, trimmed.
#[must_use]
pub fn from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let mime = value.split(';').next().unwrap_or("").trim();
    (!mime.is_empty()).then(|| mime.to_string())
}

/// MIME type for a known file extension, matched case-insensitively.
#[must_use]
pub fn known_extension(path: &str) -> Option<&'static str> {
    let ext = extension_of(path)?.trim_start_matches('.').to_lowercase();
    let mime = match ext.as_str() {
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "css" => "text/css",
        "js" => "text/javascript",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        _ => return None,
    };
    Some(mime)
}

/// Best-effort MIME type for a path, falling back to [`FALLBACK_MIME`].
#[must_use]
pub fn from_path(path: &str) -> &'static str {
    known_extension(path).unwrap_or(FALLBACK_MIME)
}
