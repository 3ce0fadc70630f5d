//! Filename extraction and sanitization for resolved files.
//!
//! Logical file names come from URLs, caller-supplied attachment names, or
//! local paths; all of them pass through the same sanitizer before they are
//! handed to the downstream pipeline.

use url::Url;

/// Fallback name when a source yields no usable file name.
pub(crate) const FALLBACK_FILE_NAME: &str = "download.bin";

/// Longest extension (dot included) considered meaningful.
const MAX_EXTENSION_LEN: usize = 12;

/// Sanitizes a logical file name for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |`) and control characters with `_`. Names that reduce
/// to nothing but separators fall back to [`FALLBACK_FILE_NAME`].
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim_matches(['_', '.']).is_empty() {
        return FALLBACK_FILE_NAME.to_string();
    }
    sanitized
}

/// Basename of a path-like string (portion after the last separator).
#[must_use]
pub fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Logical file name derived from a URL.
///
/// Uses the last non-empty path segment, percent-decoded and sanitized;
/// bare-host URLs fall back to [`FALLBACK_FILE_NAME`].
#[must_use]
pub fn file_name_from_url(url: &Url) -> String {
    if let Some(mut segments) = url.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let decoded = urlencoding::decode(last)
            .map_or_else(|_| last.to_string(), std::borrow::Cow::into_owned);
        return sanitize_file_name(&decoded);
    }
    FALLBACK_FILE_NAME.to_string()
}

/// Trailing extension of a file name or path, leading dot included.
///
/// A bare trailing dot or an extension longer than [`MAX_EXTENSION_LEN`]
/// is treated as absent.
#[must_use]
pub fn extension_of(name: &str) -> Option<&str> {
    let basename = base_name(name);
    let dot_index = basename.rfind('.')?;
    let ext = &basename[dot_index..];
    if ext.len() <= 1 || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    Some(ext)
}
