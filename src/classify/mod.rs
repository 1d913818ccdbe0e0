//! File-kind classification by content sniffing
//!
//! Stands in for a libmagic-style oracle: the scan layer uses the verdict
//! to label files in its report, and nothing in the fingerprinting or
//! extraction core depends on it. Classification reads a bounded prefix
//! of the file and matches well-known magic bytes, falling back to a
//! text heuristic for source files.

use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Broad category of a file's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileKind {
    Source,
    Binary,
    Archive,
    Other,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Source => write!(f, "SOURCE"),
            FileKind::Binary => write!(f, "BINARY"),
            FileKind::Archive => write!(f, "ARCHIVE"),
            FileKind::Other => write!(f, "OTHER"),
        }
    }
}

/// How much of the file is sniffed
const SNIFF_LEN: usize = 8192;

/// Extensions that mark printable text as source code
const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "ts", "go", "java", "c", "cpp", "h", "hpp", "sh", "rb", "pl", "html", "xml",
];

/// Classify the kind of a single file.
pub fn classify_file_kind(path: &Path) -> Result<FileKind> {
    let mut file = File::open(path).map_err(|e| ScanError::read(path, e))?;

    let mut buffer = vec![0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < SNIFF_LEN {
        let n = file
            .read(&mut buffer[filled..])
            .map_err(|e| ScanError::read(path, e))?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buffer.truncate(filled);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    Ok(classify_bytes(&buffer, &extension))
}

fn classify_bytes(data: &[u8], extension: &str) -> FileKind {
    if data.is_empty() {
        return FileKind::Other;
    }
    if is_binary_magic(data) {
        return FileKind::Binary;
    }
    if is_archive_magic(data) {
        return FileKind::Archive;
    }
    if is_printable_text(data) {
        if data.starts_with(b"#!") || SOURCE_EXTENSIONS.contains(&extension) {
            return FileKind::Source;
        }
        return FileKind::Other;
    }
    FileKind::Other
}

fn is_binary_magic(data: &[u8]) -> bool {
    matches!(
        data,
        [0x7F, b'E', b'L', b'F', ..]           // ELF
            | [0xFE, 0xED, 0xFA, ..]           // Mach-O, big endian
            | [0xCF, 0xFA, 0xED, 0xFE, ..]     // Mach-O, little endian
            | [0xCE, 0xFA, 0xED, 0xFE, ..]
            | [b'M', b'Z', ..]                 // PE
    ) || data.starts_with(b"!<arch>\n") // static library
}

fn is_archive_magic(data: &[u8]) -> bool {
    matches!(
        data,
        [0x50, 0x4B, 0x03, 0x04, ..]                 // zip
            | [0x1F, 0x8B, ..]                       // gzip
            | [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] // xz
            | [0x28, 0xB5, 0x2F, 0xFD, ..]           // zstd
            | [b'B', b'Z', b'h', ..]                 // bzip2
            | [b'7', b'z', 0xBC, 0xAF, ..]           // 7z
    ) || (data.len() >= 262 && &data[257..262] == b"ustar")
}

// Text if there is no NUL byte and nearly everything in the sniffed
// window is printable or whitespace.
fn is_printable_text(data: &[u8]) -> bool {
    if data.contains(&0) {
        return false;
    }
    let printable = data
        .iter()
        .filter(|b| b.is_ascii_graphic() || b.is_ascii_whitespace() || **b >= 0x80)
        .count();
    printable * 100 >= data.len() * 95
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn classify_temp(name: &str, bytes: &[u8]) -> FileKind {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(bytes)
            .unwrap();
        classify_file_kind(&path).unwrap()
    }

    #[test]
    fn test_elf_is_binary() {
        assert_eq!(
            classify_temp("prog", &[0x7F, b'E', b'L', b'F', 2, 1, 1, 0]),
            FileKind::Binary
        );
    }

    #[test]
    fn test_static_library_is_binary() {
        assert_eq!(classify_temp("lib.a", b"!<arch>\nfoo"), FileKind::Binary);
    }

    #[test]
    fn test_gzip_is_archive() {
        assert_eq!(
            classify_temp("pkg.tar.gz", &[0x1F, 0x8B, 0x08, 0x00]),
            FileKind::Archive
        );
    }

    #[test]
    fn test_shebang_is_source() {
        assert_eq!(
            classify_temp("install", b"#!/bin/sh\necho hi\n"),
            FileKind::Source
        );
    }

    #[test]
    fn test_rust_file_is_source() {
        assert_eq!(
            classify_temp("lib.rs", b"pub fn answer() -> u32 { 42 }\n"),
            FileKind::Source
        );
    }

    #[test]
    fn test_plain_text_is_other() {
        assert_eq!(
            classify_temp("README", b"This package does things.\n"),
            FileKind::Other
        );
    }

    #[test]
    fn test_empty_file_is_other() {
        assert_eq!(classify_temp("empty", b""), FileKind::Other);
    }

    #[test]
    fn test_unknown_binary_junk_is_other() {
        assert_eq!(
            classify_temp("blob", &[0x00, 0x01, 0x02, 0x03, 0xFF]),
            FileKind::Other
        );
    }

    #[test]
    fn test_display_matches_spdx_spelling() {
        assert_eq!(FileKind::Source.to_string(), "SOURCE");
        assert_eq!(FileKind::Other.to_string(), "OTHER");
    }
}
