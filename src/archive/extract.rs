//! Safe extraction of archives into scoped temporary directories
//!
//! Member names recorded in an archive are untrusted path strings. Every
//! name is validated before any byte is written, and destinations are
//! re-checked canonically at write time, so traversal payloads (`..`
//! segments, absolute paths, symlink tricks) cannot place files outside
//! the extraction root.

use super::{classify_archive, members_of, tar_reader, ArchiveKind, Compression};
use crate::error::{Result, ScanError};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;

/// A scoped archive extraction.
///
/// Owns the extraction root. Dropping the value removes the root and
/// everything under it on every exit path; [`Extraction::close`] does the
/// same while reporting removal failures.
#[derive(Debug)]
pub struct Extraction {
    root: TempDir,
    members: Vec<String>,
}

impl Extraction {
    /// The extraction root on disk.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Member names in archive order, as recorded.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Remove the extraction root now, surfacing any removal failure.
    pub fn close(self) -> Result<()> {
        let path = self.root.path().to_path_buf();
        self.root
            .close()
            .map_err(|source| ScanError::Cleanup { path, source })
    }
}

/// Extract an archive into a fresh uniquely named temporary directory.
///
/// Inputs that are not recognized containers fail with
/// [`ScanError::UnsupportedArchive`] before any temporary directory is
/// created. Validation is reject-before-write: all member names must pass
/// before extraction writes anything, and a member that would land
/// outside the extraction root fails the whole extraction with
/// [`ScanError::PathTraversal`]. The partially allocated root is removed
/// on every failure path.
pub fn extract_safely(path: &Path) -> Result<Extraction> {
    let kind = classify_archive(path)?.ok_or_else(|| ScanError::UnsupportedArchive {
        path: path.to_path_buf(),
    })?;

    let members = members_of(path, kind)?;

    let root = TempDir::with_prefix("packtrace-").map_err(|source| ScanError::Extract {
        path: std::env::temp_dir(),
        source,
    })?;
    let canonical_root = root
        .path()
        .canonicalize()
        .map_err(|e| ScanError::read(root.path(), e))?;

    for member in &members {
        resolve_member(&canonical_root, member)?;
    }

    match kind {
        ArchiveKind::Zip => extract_zip(path, &canonical_root)?,
        ArchiveKind::Tar(compression) => extract_tar(path, compression, &canonical_root)?,
    }

    tracing::debug!(
        "extracted {} members from {:?} into {:?}",
        members.len(),
        path,
        root.path()
    );

    Ok(Extraction { root, members })
}

/// Resolve a recorded member name against the extraction root.
///
/// Rejects names that are absolute, carry a drive prefix, or climb past
/// the root through `..` segments. Interior `..` segments that stay
/// inside the root are resolved away.
fn resolve_member(root: &Path, member: &str) -> Result<PathBuf> {
    let mut parts: Vec<std::ffi::OsString> = Vec::new();
    for component in Path::new(member).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(traversal(member, root.join(member)));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(traversal(member, PathBuf::from(member)));
            }
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(parts);
    Ok(resolved)
}

/// Create the destination's parent directory, then canonicalize it and
/// compare against the canonical root before anything is written into it.
fn ensure_parent(root: &Path, destination: &Path, member: &str) -> Result<()> {
    let parent = destination.parent().unwrap_or(root);
    fs::create_dir_all(parent).map_err(|source| ScanError::Extract {
        path: parent.to_path_buf(),
        source,
    })?;

    let canonical = parent.canonicalize().map_err(|source| ScanError::Extract {
        path: parent.to_path_buf(),
        source,
    })?;
    if !canonical.starts_with(root) {
        return Err(traversal(member, canonical));
    }
    Ok(())
}

fn traversal(member: &str, resolved: PathBuf) -> ScanError {
    ScanError::PathTraversal {
        member: member.to_owned(),
        resolved,
    }
}

fn extract_zip(path: &Path, root: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| ScanError::read(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ScanError::corrupt(path, e))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ScanError::corrupt(path, e))?;
        let member = entry.name().to_owned();
        let destination = resolve_member(root, &member)?;

        if entry.is_dir() {
            fs::create_dir_all(&destination).map_err(|source| ScanError::Extract {
                path: destination.clone(),
                source,
            })?;
            continue;
        }

        ensure_parent(root, &destination, &member)?;
        let mut output = File::create(&destination).map_err(|source| ScanError::Extract {
            path: destination.clone(),
            source,
        })?;
        io::copy(&mut entry, &mut output).map_err(|source| ScanError::Extract {
            path: destination.clone(),
            source,
        })?;
    }
    Ok(())
}

fn extract_tar(path: &Path, compression: Compression, root: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| ScanError::read(path, e))?;
    let mut archive = tar::Archive::new(tar_reader(file, compression));

    for entry in archive.entries().map_err(|e| ScanError::corrupt(path, e))? {
        let mut entry = entry.map_err(|e| ScanError::corrupt(path, e))?;
        let member = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let destination = resolve_member(root, &member)?;
        let entry_type = entry.header().entry_type();

        if entry_type.is_dir() {
            fs::create_dir_all(&destination).map_err(|source| ScanError::Extract {
                path: destination.clone(),
                source,
            })?;
        } else if entry_type.is_symlink() || entry_type.is_hard_link() {
            place_link(path, root, &mut entry, &member, &destination)?;
        } else if entry_type.is_file() {
            ensure_parent(root, &destination, &member)?;
            let mut output = File::create(&destination).map_err(|source| ScanError::Extract {
                path: destination.clone(),
                source,
            })?;
            io::copy(&mut entry, &mut output).map_err(|source| ScanError::Extract {
                path: destination.clone(),
                source,
            })?;
        } else {
            tracing::warn!("skipping special tar member '{}'", member);
        }
    }
    Ok(())
}

fn place_link(
    archive_path: &Path,
    root: &Path,
    entry: &mut tar::Entry<'_, Box<dyn io::Read>>,
    member: &str,
    destination: &Path,
) -> Result<()> {
    let target = entry
        .link_name()
        .map_err(|e| ScanError::corrupt(archive_path, e))?
        .ok_or_else(|| {
            ScanError::corrupt(archive_path, format!("member '{member}' has no link target"))
        })?
        .into_owned();

    validate_link_target(root, destination, &target, member)?;
    ensure_parent(root, destination, member)?;

    if entry.header().entry_type().is_hard_link() {
        let original = resolve_member(root, &target.to_string_lossy())?;
        fs::hard_link(&original, destination).map_err(|source| ScanError::Extract {
            path: destination.to_path_buf(),
            source,
        })?;
    } else {
        #[cfg(unix)]
        std::os::unix::fs::symlink(&target, destination).map_err(|source| {
            ScanError::Extract {
                path: destination.to_path_buf(),
                source,
            }
        })?;
        #[cfg(not(unix))]
        tracing::warn!("skipping symlink member '{}' on this platform", member);
    }
    Ok(())
}

/// Check that a link target, resolved from the link's own location,
/// cannot escape the extraction root. Absolute targets are rejected
/// outright.
fn validate_link_target(root: &Path, link: &Path, target: &Path, member: &str) -> Result<()> {
    if target.is_absolute() {
        return Err(traversal(member, target.to_path_buf()));
    }

    let mut resolved = link.parent().unwrap_or(root).to_path_buf();
    for component in target.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if resolved.as_path() == root {
                    return Err(traversal(member, resolved));
                }
                resolved.pop();
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(traversal(member, target.to_path_buf()));
            }
        }
    }

    if !resolved.starts_with(root) {
        return Err(traversal(member, resolved));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::{build_tar, build_tar_symlink, build_zip, gzip};
    use super::*;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(bytes).unwrap();
        temp
    }

    #[test]
    fn test_extract_tar_round_trip() {
        let tar_bytes = build_tar(&[("a.txt", b"alpha"), ("dir/b.txt", b"beta")]);
        let temp = write_temp(&tar_bytes);

        let extraction = extract_safely(temp.path()).unwrap();
        assert_eq!(
            extraction.members(),
            &["a.txt".to_string(), "dir/b.txt".to_string()]
        );
        assert_eq!(
            std::fs::read(extraction.root().join("a.txt")).unwrap(),
            b"alpha"
        );
        assert_eq!(
            std::fs::read(extraction.root().join("dir/b.txt")).unwrap(),
            b"beta"
        );
    }

    #[test]
    fn test_extract_tar_gz_round_trip() {
        let tar_bytes = gzip(&build_tar(&[("inner.txt", b"compressed")]));
        let temp = write_temp(&tar_bytes);

        let extraction = extract_safely(temp.path()).unwrap();
        assert_eq!(
            std::fs::read(extraction.root().join("inner.txt")).unwrap(),
            b"compressed"
        );
    }

    #[test]
    fn test_extract_zip_round_trip() {
        let zip_bytes = build_zip(&[("a.txt", b"alpha"), ("dir/b.txt", b"beta")]);
        let temp = write_temp(&zip_bytes);

        let extraction = extract_safely(temp.path()).unwrap();
        assert_eq!(
            std::fs::read(extraction.root().join("a.txt")).unwrap(),
            b"alpha"
        );
        assert_eq!(
            std::fs::read(extraction.root().join("dir/b.txt")).unwrap(),
            b"beta"
        );
    }

    #[test]
    fn test_scope_exit_removes_root() {
        let tar_bytes = build_tar(&[("a.txt", b"alpha")]);
        let temp = write_temp(&tar_bytes);

        let extraction = extract_safely(temp.path()).unwrap();
        let root = extraction.root().to_path_buf();
        assert!(root.exists());

        drop(extraction);
        assert!(!root.exists());
    }

    #[test]
    fn test_close_removes_root() {
        let tar_bytes = build_tar(&[("a.txt", b"alpha")]);
        let temp = write_temp(&tar_bytes);

        let extraction = extract_safely(temp.path()).unwrap();
        let root = extraction.root().to_path_buf();
        extraction.close().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_tar_traversal_rejected() {
        let tar_bytes = build_tar(&[("../packtrace-test-evil-tar.txt", b"payload")]);
        let temp = write_temp(&tar_bytes);

        let err = extract_safely(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::PathTraversal { .. }));
        assert!(!std::env::temp_dir()
            .join("packtrace-test-evil-tar.txt")
            .exists());
    }

    #[test]
    fn test_zip_traversal_rejected() {
        let zip_bytes = build_zip(&[("../packtrace-test-evil-zip.txt", b"payload")]);
        let temp = write_temp(&zip_bytes);

        let err = extract_safely(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::PathTraversal { .. }));
        assert!(!std::env::temp_dir()
            .join("packtrace-test-evil-zip.txt")
            .exists());
    }

    #[test]
    fn test_deep_traversal_rejected() {
        let tar_bytes = build_tar(&[("../../../../etc/packtrace-test-evil", b"payload")]);
        let temp = write_temp(&tar_bytes);

        let err = extract_safely(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::PathTraversal { .. }));
    }

    #[test]
    fn test_absolute_member_rejected() {
        let tar_bytes = build_tar(&[("/packtrace-test-absolute.txt", b"payload")]);
        let temp = write_temp(&tar_bytes);

        let err = extract_safely(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::PathTraversal { .. }));
    }

    #[test]
    fn test_traversal_anywhere_aborts_before_write() {
        // The good member comes first in archive order; validation still
        // rejects the whole archive before anything is written.
        let tar_bytes = build_tar(&[
            ("good.txt", b"fine" as &[u8]),
            ("../packtrace-test-late-evil.txt", b"payload"),
        ]);
        let temp = write_temp(&tar_bytes);

        let err = extract_safely(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::PathTraversal { .. }));
        assert!(!std::env::temp_dir()
            .join("packtrace-test-late-evil.txt")
            .exists());
    }

    #[test]
    fn test_interior_dotdot_resolves_inside_root() {
        let tar_bytes = build_tar(&[("sub/../flat.txt", b"ok")]);
        let temp = write_temp(&tar_bytes);

        let extraction = extract_safely(temp.path()).unwrap();
        assert_eq!(
            std::fs::read(extraction.root().join("flat.txt")).unwrap(),
            b"ok"
        );
    }

    #[test]
    fn test_unsupported_input_rejected() {
        let temp = write_temp(b"plain text, not a container");

        let err = extract_safely(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedArchive { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_member_inside_root() {
        let tar_bytes = build_tar_symlink(&[("a.txt", b"alpha")], "alias", "a.txt");
        let temp = write_temp(&tar_bytes);

        let extraction = extract_safely(temp.path()).unwrap();
        let alias = extraction.root().join("alias");
        assert!(alias.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read(&alias).unwrap(), b"alpha");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let tar_bytes = build_tar_symlink(&[], "escape", "../../outside");
        let temp = write_temp(&tar_bytes);

        let err = extract_safely(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::PathTraversal { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_symlink_target_rejected() {
        let tar_bytes = build_tar_symlink(&[], "escape", "/etc/passwd");
        let temp = write_temp(&tar_bytes);

        let err = extract_safely(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::PathTraversal { .. }));
    }

    #[test]
    fn test_resolve_member_accepts_nested_names() {
        let root = Path::new("/tmp/packtrace-root");
        let resolved = resolve_member(root, "a/b/c.txt").unwrap();
        assert_eq!(resolved, root.join("a/b/c.txt"));
    }

    #[test]
    fn test_resolve_member_strips_curdir() {
        let root = Path::new("/tmp/packtrace-root");
        let resolved = resolve_member(root, "./a/./b.txt").unwrap();
        assert_eq!(resolved, root.join("a/b.txt"));
    }
}
