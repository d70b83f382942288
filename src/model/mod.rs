//! A read-only representation of a synchronous Boolean network.
//!
//! [`NetworkModel`] is what the simulation and basin sampling algorithms work with. It can be
//! assembled by hand (mostly useful in tests) or converted from a
//! [`BooleanNetwork`](biodivine_lib_param_bn::BooleanNetwork) loaded from an `.aeon` or `.bnet`
//! file (see [`NetworkModel::from`]).

mod conversion;


use crate::fingerprint::ModelFingerprint;
use crate::state::{BooleanState, EvalError, Expr, Variable};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The update rule of a single network variable.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum UpdateRule {
    Constant(bool),
    Function(Expr),
}

impl UpdateRule {
    pub fn evaluate(&self, state: &BooleanState) -> Result<bool, EvalError> {
        match self {
            UpdateRule::Constant(value) => Ok(*value),
            UpdateRule::Function(expr) => expr.evaluate(state),
        }
    }
}

impl From<Expr> for UpdateRule {
    fn from(value: Expr) -> Self {
        match value {
            Expr::Const(value) => UpdateRule::Constant(value),
            expr => UpdateRule::Function(expr),
        }
    }
}

impl From<bool> for UpdateRule {
    fn from(value: bool) -> Self {
        UpdateRule::Constant(value)
    }
}

/// A set of variables, each with an optional [`UpdateRule`].
///
/// Variables without a rule keep their value during synchronous updates.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct NetworkModel {
    rules: BTreeMap<Variable, Option<UpdateRule>>,
}

impl NetworkModel {
    pub fn new() -> NetworkModel {
        NetworkModel::default()
    }

    /// Add a variable without an update rule.
    pub fn with_variable(mut self, name: impl Into<Variable>) -> NetworkModel {
        self.rules.entry(name.into()).or_insert(None);
        self
    }

    /// Add (or replace) a variable with the given update rule.
    ///
    /// Variables referenced by the rule are *not* added automatically.
    pub fn with_rule(mut self, name: impl Into<Variable>, rule: impl Into<UpdateRule>) -> Self {
        self.rules.insert(name.into(), Some(rule.into()));
        self
    }

    pub fn with_constant(self, name: impl Into<Variable>, value: bool) -> NetworkModel {
        self.with_rule(name, UpdateRule::Constant(value))
    }

    pub fn num_vars(&self) -> usize {
        self.rules.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Iterate over the network variables, sorted by name.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.rules.keys()
    }

    pub fn rule(&self, name: &str) -> Option<&UpdateRule> {
        self.rules.get(name).and_then(|it| it.as_ref())
    }

    pub fn fingerprint(&self) -> ModelFingerprint {
        ModelFingerprint::compute(self.variables())
    }

    /// True if `state` assigns exactly the variables of this model.
    pub fn is_total(&self, state: &BooleanState) -> bool {
        state.len() == self.num_vars() && self.variables().all(|it| state.contains(it.as_str()))
    }

    /// Compute the synchronous successor of `state`.
    ///
    /// All rules are evaluated against the same (immutable) `state`. A variable without a rule,
    /// or with a rule that cannot be evaluated, keeps its current value. Variables missing
    /// from `state` are read as `false`.
    pub fn successor(&self, state: &BooleanState) -> BooleanState {
        self.rules
            .iter()
            .map(|(name, rule)| {
                let current = state.get(name.as_str()).unwrap_or(false);
                let next = match rule {
                    None => current,
                    Some(rule) => rule.evaluate(state).unwrap_or_else(|error| {
                        debug!("Cannot update `{name}` ({error}); keeping `{current}`.");
                        current
                    }),
                };
                (name.clone(), next)
            })
            .collect()
    }

    /// Draw a state by flipping an independent fair coin for each variable (in name order).
    pub fn random_state<R: Rng + ?Sized>(&self, rng: &mut R) -> BooleanState {
        self.variables()
            .map(|name| (name.clone(), rng.gen_bool(0.5)))
            .collect()
    }

    /// A copy of this model in which `name` is fixed to the constant `value`.
    pub fn force(&self, name: impl Into<Variable>, value: bool) -> NetworkModel {
        let name = name.into();
        if !self.contains(name.as_str()) {
            warn!("Forcing `{name}` which is not a variable of the model; it will be added.");
        }
        self.clone().with_constant(name, value)
    }

    /// A copy of this model in which `name` is knocked out (always `false`).
    pub fn knockout(&self, name: impl Into<Variable>) -> NetworkModel {
        self.force(name, false)
    }
}
