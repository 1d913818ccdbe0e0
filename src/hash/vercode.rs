//! SPDX-style package verification codes

use sha1::{Digest, Sha1};
use std::collections::{BTreeSet, HashSet};

/// Compute a verification code summarizing a set of content hashes.
///
/// The inputs are treated as a set: duplicates collapse and order is
/// irrelevant. Hashes present in `excluded` are dropped, the survivors are
/// sorted, concatenated with no separator, and the SHA-1 of the resulting
/// string is returned as lowercase hex. An empty input set yields the SHA-1
/// of the empty string rather than an error.
pub fn verification_code<I, S>(hashes: I, excluded: &HashSet<String>) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let survivors: BTreeSet<String> = hashes
        .into_iter()
        .map(|h| h.as_ref().to_owned())
        .filter(|h| !excluded.contains(h))
        .collect();

    let mut hasher = Sha1::new();
    for hash in &survivors {
        hasher.update(hash.as_bytes());
    }
    hex::encode(hasher.finalize())
}
