use crate::model::{NetworkModel, UpdateRule};
use crate::solver::{SolverError, StableStateSolver};
use crate::state::{BooleanState, RawState, RawValue, Variable};
use cancel_this::{Cancellable, is_cancelled};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Computes the fixed points of a [`NetworkModel`] by a depth-first search over partial
/// states, assigning variables in name order.
///
/// The rule of a variable is checked as soon as the variable and all model variables it reads
/// have a value, and branches that already violate a rule are not explored further. A state is
/// reported exactly when [`NetworkModel::successor`] maps it to itself, so this works for any
/// model, including the ones produced by [`NetworkModel::force`] and [`NetworkModel::knockout`].
#[derive(Clone, Debug)]
pub struct ModelFixedPoints {
    model: Arc<NetworkModel>,
    /// Stop enumerating after this many states (default: `usize::MAX`).
    pub max_states: usize,
}

impl From<NetworkModel> for ModelFixedPoints {
    fn from(value: NetworkModel) -> Self {
        ModelFixedPoints::new(value)
    }
}

impl ModelFixedPoints {
    pub fn new(model: impl Into<Arc<NetworkModel>>) -> ModelFixedPoints {
        ModelFixedPoints {
            model: model.into(),
            max_states: usize::MAX,
        }
    }

    pub fn with_max_states(mut self, max_states: usize) -> ModelFixedPoints {
        self.max_states = max_states;
        self
    }

    pub fn model(&self) -> &NetworkModel {
        &self.model
    }

    /// All fixed points of the model, in the order of their state numbers (the first
    /// variable is the most significant bit, `false` before `true`).
    pub fn fixed_points(&self) -> Cancellable<Vec<BooleanState>> {
        let mut search = FixedPointSearch::new(&self.model, self.max_states);
        search.visit(0)?;
        debug!("Fixed point search visited {} partial states.", search.visited);
        Ok(search.found)
    }
}

impl StableStateSolver for ModelFixedPoints {
    fn stable_states(&self) -> Result<Vec<RawState>, SolverError> {
        let start = Instant::now();
        let fixed_points = self.fixed_points().map_err(|e| {
            SolverError::Unavailable(format!("fixed point search cancelled ({e})"))
        })?;
        info!(
            "Found {} stable states in {:.2}s.",
            fixed_points.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(fixed_points
            .iter()
            .map(|state| {
                state
                    .iter()
                    .map(|(name, value)| (name.clone(), RawValue::Bool(value)))
                    .collect()
            })
            .collect())
    }
}

struct FixedPointSearch<'a> {
    model: &'a NetworkModel,
    order: Vec<&'a Variable>,
    /// `checks[i]` are the variables whose rule can be decided once `order[..=i]` is assigned.
    checks: Vec<Vec<&'a Variable>>,
    max_states: usize,
    /// Only `order[..depth]` is meaningful; later entries may hold stale values.
    state: BooleanState,
    found: Vec<BooleanState>,
    visited: usize,
}

impl<'a> FixedPointSearch<'a> {
    fn new(model: &'a NetworkModel, max_states: usize) -> FixedPointSearch<'a> {
        let order: Vec<&Variable> = model.variables().collect();
        let index: BTreeMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let mut checks = vec![Vec::new(); order.len()];
        for (i, name) in order.iter().enumerate() {
            let Some(rule) = model.rule(name.as_str()) else {
                // Rule-less variables keep their value.
                continue;
            };
            let depth = match rule {
                UpdateRule::Constant(_) => i,
                UpdateRule::Function(expr) => expr
                    .support()
                    .into_iter()
                    .filter_map(|it| index.get(it.as_str()).copied())
                    .fold(i, usize::max),
            };
            checks[depth].push(*name);
        }
        FixedPointSearch {
            model,
            order,
            checks,
            max_states,
            state: BooleanState::new(),
            found: Vec::new(),
            visited: 0,
        }
    }

    fn visit(&mut self, depth: usize) -> Cancellable<()> {
        if self.found.len() >= self.max_states {
            return Ok(());
        }
        if depth == self.order.len() {
            self.found.push(self.state.clone());
            return Ok(());
        }
        is_cancelled!()?;
        for value in [false, true] {
            self.visited += 1;
            self.state.set(self.order[depth].clone(), value);
            if self.is_consistent(depth) {
                self.visit(depth + 1)?;
            }
        }
        Ok(())
    }

    /// True if every rule decided at `depth` keeps the value of its variable.
    fn is_consistent(&self, depth: usize) -> bool {
        self.checks[depth].iter().all(|name| {
            let current = self.state.get(name.as_str()).unwrap_or(false);
            match self.model.rule(name.as_str()) {
                None => true,
                Some(rule) => rule.evaluate(&self.state).unwrap_or(current) == current,
            }
        })
    }
}
