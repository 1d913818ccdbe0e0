//! PackTrace - package fingerprinting and safe-extraction tool
//!
//! This library turns an arbitrary software package (a directory, tarball,
//! or zip file) into deterministic provenance artifacts: a verification
//! code over all file contents, a per-file content-hash map, and an
//! independent identity code over the tree's shape. Archive inputs are
//! extracted into scoped temporary directories with path-traversal
//! validation before any byte reaches disk.

pub mod archive;
pub mod classify;
pub mod cli;
pub mod error;
pub mod fingerprint;
pub mod hash;
pub mod ident;
pub mod scan;

/// Re-export commonly used types
pub use archive::{classify_archive, extract_safely, list_members, ArchiveKind, Extraction};
pub use error::{Result, ScanError};
pub use fingerprint::{fingerprint_directory, DirectoryFingerprint};
pub use hash::{content_hash, verification_code};
pub use ident::generate_identifier;
pub use scan::{scan_package, PackageScan, ScanConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "packtrace";
