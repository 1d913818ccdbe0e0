//! Content hashing for package files
//!
//! Every file identity in PackTrace is a SHA-256 digest rendered as a
//! lowercase hex string. Verification codes summarizing whole file sets
//! live in [`vercode`].

mod vercode;

pub use vercode::verification_code;

use crate::error::{Result, ScanError};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Size of chunks streamed through the digest
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 content hash of a file as a lowercase hex string.
///
/// The file is streamed through the digest in fixed-size chunks; the result
/// is identical to hashing the whole buffer at once. An unreadable file is
/// a hard error, never a skipped entry.
pub fn content_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| ScanError::read(path, e))?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file
            .read(&mut buffer)
            .map_err(|e| ScanError::read(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the SHA-256 hash of an in-memory buffer.
pub fn content_hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_content_hash_bytes_known_digest() {
        // Known SHA-256 of "hello world"
        let expected = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
        assert_eq!(content_hash_bytes(b"hello world"), expected);
    }

    #[test]
    fn test_content_hash_matches_buffer_hash() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(b"some package file content").unwrap();

        let from_file = content_hash(temp.path()).unwrap();
        let from_bytes = content_hash_bytes(b"some package file content");
        assert_eq!(from_file, from_bytes);
    }

    #[test]
    fn test_content_hash_is_stable() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(b"stable contents").unwrap();

        let first = content_hash(temp.path()).unwrap();
        let second = content_hash(temp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_content_hash_changes_with_content() {
        let a = content_hash_bytes(b"aaaa");
        let b = content_hash_bytes(b"aaab");
        assert_ne!(a, b);
    }

    #[test]
    fn test_content_hash_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = content_hash(&missing).unwrap_err();
        assert!(matches!(err, ScanError::Read { .. }));
    }

    #[test]
    fn test_content_hash_large_file_spans_chunks() {
        let data = vec![0xabu8; CHUNK_SIZE * 2 + 17];
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(&data).unwrap();

        assert_eq!(content_hash(temp.path()).unwrap(), content_hash_bytes(&data));
    }
}
