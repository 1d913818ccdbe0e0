//! Package scanning orchestration
//!
//! Entry point tying the core together: archives are safely extracted
//! into a scoped temporary directory and fingerprinted there, plain
//! directories are fingerprinted in place. The extraction root never
//! outlives the scan.

mod config;

pub use config::ScanConfig;

use crate::archive::{classify_archive, extract_safely};
use crate::classify::{classify_file_kind, FileKind};
use crate::error::Result;
use crate::fingerprint::{fingerprint_directory, relative_name};
use crate::ident::{generate_identifier, package_friendly_name};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Record for a single file in a scanned package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Normalized path relative to the package root
    pub path: String,
    /// SHA-256 content hash
    pub sha256: String,
    /// Classified kind of the file
    pub kind: FileKind,
}

/// Result of scanning one package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageScan {
    /// Friendly name of the scanned package
    pub name: String,
    /// Generated identifier for this package element
    pub identifier: String,
    /// Verification code over all file content hashes
    pub verification_code: String,
    /// Independent code over the tree's relative path shape
    pub relative_identity_code: String,
    /// Per-file records, sorted by path
    pub files: Vec<FileRecord>,
    /// When the scan ran
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

/// Scan a package: a directory, tarball, or zip file.
///
/// Archive inputs are extracted into a scoped temporary directory which
/// is removed when the scan completes, whether it succeeds or fails. A
/// cleanup failure is reported only when the scan itself succeeded; an
/// earlier error always takes precedence.
pub fn scan_package(path: &Path, config: &ScanConfig) -> Result<PackageScan> {
    let excluded = config.excluded_set();
    let name = package_name(path);

    if path.is_dir() {
        tracing::debug!("scanning directory package {:?}", path);
        return build_scan(&name, path, &excluded, config);
    }

    tracing::debug!("scanning archive package {:?}", path);
    let extraction = extract_safely(path)?;
    let scan = build_scan(&name, extraction.root(), &excluded, config);
    let cleanup = extraction.close();

    match (scan, cleanup) {
        (Ok(scan), Ok(())) => Ok(scan),
        (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
        (Err(scan_err), _) => Err(scan_err),
    }
}

/// Whether the input looks like something `scan_package` can handle.
pub fn is_scannable(path: &Path) -> Result<bool> {
    Ok(path.is_dir() || classify_archive(path)?.is_some())
}

fn build_scan(
    name: &str,
    root: &Path,
    excluded: &HashSet<String>,
    config: &ScanConfig,
) -> Result<PackageScan> {
    let fingerprint = fingerprint_directory(root, excluded)?;
    let canonical_root = root.canonicalize().map_err(|e| crate::error::ScanError::read(root, e))?;

    let mut files = Vec::with_capacity(fingerprint.file_hashes.len());
    for (path, sha256) in &fingerprint.file_hashes {
        files.push(FileRecord {
            path: relative_name(&canonical_root, path),
            sha256: sha256.clone(),
            kind: classify_file_kind(path)?,
        });
    }

    let identifier = generate_identifier(
        &config.identifier_category,
        Some(name),
        Some(&fingerprint.verification_code),
    );

    Ok(PackageScan {
        name: name.to_owned(),
        identifier,
        verification_code: fingerprint.verification_code,
        relative_identity_code: fingerprint.relative_identity_code,
        files,
        scanned_at: chrono::Utc::now(),
    })
}

fn package_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    package_friendly_name(&base)
}
