//! Directory fingerprinting
//!
//! Walks a package tree and reduces it to three deterministic artifacts:
//! a verification code over file contents, a map of per-file content
//! hashes, and an independent identity code over the tree's relative
//! path shape.

mod walker;

pub use walker::walk_paths;

use crate::error::{Result, ScanError};
use crate::hash::{content_hash, content_hash_bytes, verification_code};
use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};

/// Deterministic fingerprint of a directory tree
#[derive(Debug, Clone)]
pub struct DirectoryFingerprint {
    /// Verification code over the content hashes of all regular files,
    /// minus excluded hashes
    pub verification_code: String,
    /// Content hash of every regular file, keyed by absolute path.
    /// Excluded files still appear here; exclusion applies to codes only.
    pub file_hashes: BTreeMap<PathBuf, String>,
    /// Verification code over SHA-256 digests of the normalized relative
    /// path of every non-excluded regular file
    pub relative_identity_code: String,
}

/// Fingerprint every regular file under `root`.
///
/// Running this twice over an unmodified tree yields bit-identical
/// results. A file that disappears or becomes unreadable between the walk
/// and the hash aborts the whole operation; silently skipping it would
/// change what the verification code means.
pub fn fingerprint_directory(
    root: &Path,
    excluded: &HashSet<String>,
) -> Result<DirectoryFingerprint> {
    let root = root
        .canonicalize()
        .map_err(|e| ScanError::read(root, e))?;

    let mut listing = walk_paths(&root).collect::<Result<Vec<_>>>()?;
    listing.sort();

    let mut file_hashes = BTreeMap::new();
    for path in listing {
        if is_regular_file(&path)? {
            let hash = content_hash(&path)?;
            file_hashes.insert(path, hash);
        }
    }

    let code = verification_code(file_hashes.values(), excluded);

    let mut relative_listing: Vec<String> = file_hashes
        .iter()
        .filter(|(_, hash)| !excluded.contains(*hash))
        .map(|(path, _)| relative_name(&root, path))
        .collect();
    relative_listing.sort();

    // Each relative path is digested before entering the same
    // sort-concat-SHA-1 routine used for content hashes.
    let relative_digests = relative_listing
        .iter()
        .map(|name| content_hash_bytes(name.as_bytes()));
    let relative_identity_code = verification_code(relative_digests, &HashSet::new());

    Ok(DirectoryFingerprint {
        verification_code: code,
        file_hashes,
        relative_identity_code,
    })
}

/// Normalize the path from `root` to `path` as `./a/b`, with `/` as the
/// separator on every platform so repeated runs produce stable names.
pub fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let mut name = String::from(".");
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}

fn is_regular_file(path: &Path) -> Result<bool> {
    let metadata = std::fs::symlink_metadata(path).map_err(|e| ScanError::read(path, e))?;
    Ok(metadata.is_file())
}
