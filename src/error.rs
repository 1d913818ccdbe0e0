//! Typed errors for the fingerprinting and extraction core

use std::io;
use std::path::PathBuf;

/// Errors surfaced by the scanning core
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} is not a recognized archive container")]
    UnsupportedArchive { path: PathBuf },

    #[error("archive member '{member}' resolves outside the extraction root: {resolved:?}")]
    PathTraversal { member: String, resolved: PathBuf },

    #[error("archive {path:?} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to write {path:?} during extraction: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove extraction root {path:?}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub(crate) fn read(path: &std::path::Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, ScanError>;
