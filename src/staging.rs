//! Staged temp path generation for downloaded and materialized files.
//!
//! Paths are computed here, never created: file creation belongs to the
//! caller. Collision resistance across concurrent callers comes from a
//! 160-bit token drawn from the OS CSPRNG, so no shared counter or lock
//! is involved.

use std::path::PathBuf;

use rand::RngCore;
use rand::rngs::OsRng;

use crate::filename::extension_of;

/// Number of random bytes in a staged filename token.
const TOKEN_BYTES: usize = 20;

/// Lowercase RFC 4648 base32 alphabet; filesystem-safe on every platform.
const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Computes a staged path under the system temp directory.
///
/// The filename is a 32-character base32 token (20 CSPRNG bytes encode to
/// exactly 32 characters, so padding never arises) plus the extension of
/// `extension_source`, copied verbatim when present.
#[must_use]
pub fn stage_path(extension_source: Option<&str>) -> PathBuf {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    let mut name = encode_base32(&bytes);
    if let Some(ext) = extension_source.and_then(extension_of) {
        name.push_str(ext);
    }
    std::env::temp_dir().join(name)
}

/// Encodes bytes into the lowercase base32 alphabet, most significant bits first.
fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(5) * 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in bytes {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            let index = ((buffer >> bits) & 0x1f) as usize;
            out.push(BASE32_ALPHABET[index] as char);
        }
    }
    if bits > 0 {
        let index = ((buffer << (5 - bits)) & 0x1f) as usize;
        out.push(BASE32_ALPHABET[index] as char);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_path_lives_under_temp_dir() {
        let path = stage_path(None);
        assert!(path.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_stage_path_token_is_32_chars_without_extension() {
        let path = stage_path(None);
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), 32);
        assert!(name.bytes().all(|b| BASE32_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_stage_path_copies_extension_verbatim() {
        let path = stage_path(Some("photos/holiday.JPG"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with(".JPG"), "got {name}");
        assert_eq!(name.len(), 32 + ".JPG".len());
    }

    #[test]
    fn test_stage_path_ignores_missing_extension() {
        let path = stage_path(Some("README"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), 32);
    }

    #[test]
    fn test_stage_path_distinct_across_calls() {
        let first = stage_path(Some("a.png"));
        let second = stage_path(Some("a.png"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_encode_base32_known_vectors() {
        // RFC 4648 test vectors, lowercased and unpadded.
        assert_eq!(encode_base32(b""), "");
        assert_eq!(encode_base32(b"f"), "my");
        assert_eq!(encode_base32(b"fo"), "mzxq");
        assert_eq!(encode_base32(b"foo"), "mzxw6");
        assert_eq!(encode_base32(b"foob"), "mzxw6yq");
        assert_eq!(encode_base32(b"fooba"), "mzxw6ytb");
        assert_eq!(encode_base32(b"foobar"), "mzxw6ytboi");
    }
}
