use crate::state::{BooleanState, RawState, coerce_state};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A normalized representation of a [`BooleanState`] used for equality and deduplication.
///
/// The key lists `name=0|1` pairs sorted by variable name and separated by commas. Two states
/// with the same content always have the same key, regardless of how they were built.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&BooleanState> for CanonicalKey {
    fn from(value: &BooleanState) -> Self {
        let mut key = String::new();
        for (i, (name, value)) in value.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(name.as_str());
            key.push('=');
            key.push(if value { '1' } else { '0' });
        }
        CanonicalKey(key)
    }
}

impl Display for CanonicalKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coerce all values of `state` and compute its [`CanonicalKey`].
pub fn canonicalize(state: &RawState) -> CanonicalKey {
    coerce_state(state).key()
}
