//! SPDX-style identifier generation and friendly names
//!
//! Identifiers are human-traceable but never deterministic: a fresh
//! UUIDv4 guarantees global uniqueness even for identical inputs, while a
//! short slice of the content hash keeps them greppable next to the file
//! they describe.

use std::path::Path;
use uuid::Uuid;

const NAMESPACE_PREFIX: &str = "SPDXRef";
const MAX_NAME_LEN: usize = 20;

/// Generate a globally unique identifier for an element.
///
/// Shape: `SPDXRef-<category>-<name>-<hash4>-<uuid8>`, where `<name>` is
/// the sanitized basename of `name` (or a slice of the fresh UUID when
/// absent), `<hash4>` is the first four characters of `content_hash` (or
/// of the UUID when absent), and `<uuid8>` is the first eight characters
/// of the fresh UUID.
pub fn generate_identifier(
    category: &str,
    name: Option<&str>,
    content_hash: Option<&str>,
) -> String {
    let unique = Uuid::new_v4().to_string();

    let hash_part = match content_hash {
        Some(hash) => hash.get(..4).unwrap_or(hash),
        None => &unique[24..28],
    };
    let name_part = match name {
        Some(name) => sanitize_name(basename(name)),
        None => sanitize_name(&unique[9..39]),
    };

    format!(
        "{}-{}-{}-{}-{}",
        NAMESPACE_PREFIX,
        category,
        name_part,
        hash_part,
        &unique[..8]
    )
}

/// Return the name of a package file, without its archive extension.
/// `pkg-1.0.tar.gz` and `pkg-1.0.zip` both become `pkg-1.0`.
pub fn package_friendly_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_owned());

    match stem.strip_suffix(".tar") {
        Some(inner) => inner.to_owned(),
        None => stem,
    }
}

/// Return a document-namespace suffix for an SPDX document name.
pub fn namespace_suffix(doc_name: &str) -> String {
    format!("/{}-{}", doc_name, Uuid::new_v4())
}

/// Strip illegal characters and bound the length of a name fragment.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_NAME_LEN)
        .collect()
}

fn basename(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
}
