//! Recursive directory traversal

use crate::error::{Result, ScanError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazily yield every path under `root` (directories and files) as an
/// absolute path. The root itself is not yielded.
///
/// Symlinks are never followed; a symlink is yielded as its own path and
/// its target is not descended into. Ordering within a directory level is
/// not guaranteed; callers needing determinism must sort the output.
pub fn walk_paths(root: &Path) -> impl Iterator<Item = Result<PathBuf>> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .map(move |entry| {
            entry.map(|e| e.path().to_path_buf()).map_err(|err| {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                ScanError::Read {
                    path,
                    source: err.into(),
                }
            })
        })
}
