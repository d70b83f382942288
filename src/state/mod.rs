//! Boolean states and the conversion of "raw" (possibly unresolved) values into them.
//!
//! Values coming from outside the engine (stable-state solvers, persisted data, hand-written
//! models) are described by [`RawValue`]. Before such a value reaches any algorithm, it is
//! reduced to a crisp `bool` using [`safe_coerce`], which never fails. Everything downstream
//! (simulation, catalogs, basin graphs) works only with [`BooleanState`] and its
//! [`CanonicalKey`].

mod canonical;
mod coercion;
mod expr;


pub use canonical::{CanonicalKey, canonicalize};
pub use coercion::{RawState, RawValue, coerce_state, safe_coerce};
pub use expr::{EvalError, Expr};

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Name of a network variable. Variables are compared (and therefore sorted) by name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Variable {
        Variable(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Variable {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Variable {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable(value.to_string())
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable(value)
    }
}

/// An assignment of crisp Boolean values to network variables.
///
/// The state is backed by a sorted map, hence iteration order (and everything derived from it,
/// like the [`CanonicalKey`]) does not depend on the order in which values were inserted.
/// Whether the state is *total* with respect to a particular model is checked by
/// [`NetworkModel::is_total`](crate::model::NetworkModel::is_total).
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BooleanState(BTreeMap<Variable, bool>);

impl BooleanState {
    pub fn new() -> BooleanState {
        BooleanState::default()
    }

    /// Value of the given variable, or `None` if the state does not assign it.
    pub fn get(&self, variable: &str) -> Option<bool> {
        self.0.get(variable).copied()
    }

    pub fn set(&mut self, variable: impl Into<Variable>, value: bool) {
        self.0.insert(variable.into(), value);
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.0.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(variable, value)` pairs in the order of variable names.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, bool)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.0.keys()
    }

    /// Number of variables which are `true` in this state.
    pub fn count_active(&self) -> usize {
        self.0.values().filter(|it| **it).count()
    }

    pub fn active_variables(&self) -> impl Iterator<Item = &Variable> {
        self.iter().filter(|(_, v)| *v).map(|(k, _)| k)
    }

    pub fn inactive_variables(&self) -> impl Iterator<Item = &Variable> {
        self.iter().filter(|(_, v)| !*v).map(|(k, _)| k)
    }

    /// The canonical (order independent) key of this state.
    pub fn key(&self) -> CanonicalKey {
        CanonicalKey::from(self)
    }
}

impl FromIterator<(Variable, bool)> for BooleanState {
    fn from_iter<T: IntoIterator<Item = (Variable, bool)>>(iter: T) -> Self {
        BooleanState(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, bool); N]> for BooleanState {
    fn from(value: [(&str, bool); N]) -> Self {
        value
            .into_iter()
            .map(|(name, value)| (Variable::from(name), value))
            .collect()
    }
}

impl Display for BooleanState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
