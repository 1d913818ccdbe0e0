//! Archive container handling
//!
//! This module decides whether a package file is a recognized archive
//! container (by sniffing magic bytes, never the file extension), lists
//! member names as recorded inside the archive, and safely extracts
//! members into a scoped temporary directory.

mod extract;

pub use extract::{extract_safely, Extraction};

#[cfg(test)]
pub(crate) use extract::test_support;

use crate::error::{Result, ScanError};
use flate2::read::GzDecoder;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compression applied to a tar container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

/// Recognized archive container kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar(Compression),
    Zip,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveKind::Tar(Compression::None) => write!(f, "tar"),
            ArchiveKind::Tar(Compression::Gzip) => write!(f, "tar (gzip)"),
            ArchiveKind::Zip => write!(f, "zip"),
        }
    }
}

// A plain tar header is only identifiable by the ustar magic at offset 257.
const SNIFF_LEN: usize = 512;

/// Classify a file as a recognized archive container, or `None`.
pub fn classify_archive(path: &Path) -> Result<Option<ArchiveKind>> {
    let mut file = File::open(path).map_err(|e| ScanError::read(path, e))?;

    let mut header = [0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < SNIFF_LEN {
        let n = file
            .read(&mut header[filled..])
            .map_err(|e| ScanError::read(path, e))?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    Ok(detect(&header[..filled]))
}

/// Sniff an archive container from leading bytes.
pub(crate) fn detect(data: &[u8]) -> Option<ArchiveKind> {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] => Some(ArchiveKind::Zip),
        [0x1F, 0x8B, ..] => Some(ArchiveKind::Tar(Compression::Gzip)),
        _ if is_tar_header(data) => Some(ArchiveKind::Tar(Compression::None)),
        _ => None,
    }
}

// Both POSIX ("ustar\0") and GNU ("ustar  \0") archives share the first
// five magic bytes at offset 257.
fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 262 && &data[257..262] == b"ustar"
}

/// List member names in archive order, exactly as recorded.
///
/// The listing is raw bookkeeping metadata; names are not validated for
/// path safety here. Validation happens in [`extract_safely`] before any
/// byte is written to disk.
pub fn list_members(path: &Path) -> Result<Vec<String>> {
    let kind = classify_archive(path)?.ok_or_else(|| ScanError::UnsupportedArchive {
        path: path.to_path_buf(),
    })?;
    members_of(path, kind)
}

pub(crate) fn members_of(path: &Path, kind: ArchiveKind) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| ScanError::read(path, e))?;

    match kind {
        ArchiveKind::Zip => {
            let mut archive =
                zip::ZipArchive::new(file).map_err(|e| ScanError::corrupt(path, e))?;
            let mut members = Vec::with_capacity(archive.len());
            for index in 0..archive.len() {
                let entry = archive
                    .by_index_raw(index)
                    .map_err(|e| ScanError::corrupt(path, e))?;
                members.push(entry.name().to_owned());
            }
            Ok(members)
        }
        ArchiveKind::Tar(compression) => {
            let mut archive = tar::Archive::new(tar_reader(file, compression));
            let mut members = Vec::new();
            for entry in archive.entries().map_err(|e| ScanError::corrupt(path, e))? {
                let entry = entry.map_err(|e| ScanError::corrupt(path, e))?;
                members.push(String::from_utf8_lossy(&entry.path_bytes()).into_owned());
            }
            Ok(members)
        }
    }
}

pub(crate) fn tar_reader(file: File, compression: Compression) -> Box<dyn Read> {
    match compression {
        Compression::Gzip => Box::new(GzDecoder::new(file)),
        Compression::None => Box::new(file),
    }
}
