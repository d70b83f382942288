//! Order-invariant fingerprints of network variable sets.
//!
//! The fingerprint is a SHA-256 digest over a domain separation tag, the number of variables
//! and the length-prefixed, sorted variable names. Only the *names* participate, not the update
//! rules: two models over the same variables share a fingerprint.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter};

/// Changing this tag invalidates all previously computed fingerprints.
const DOMAIN_TAG: &[u8] = b"biodivine-algo-basins:variables:v1";

/// A hex-encoded 256-bit digest of a variable set.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelFingerprint(String);

impl ModelFingerprint {
    /// Fingerprint of the given variable names. Order and duplicates are irrelevant.
    pub fn compute<I, S>(variables: I) -> ModelFingerprint
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<S> = variables.into_iter().collect();
        names.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        names.dedup_by(|a, b| a.as_ref() == b.as_ref());

        let mut hasher = Sha256::new();
        hash_len_prefixed(&mut hasher, DOMAIN_TAG);
        hasher.update((names.len() as u64).to_le_bytes());
        for name in &names {
            hash_len_prefixed(&mut hasher, name.as_ref().as_bytes());
        }
        ModelFingerprint(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ModelFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn hash_len_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
