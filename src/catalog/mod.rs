//! Structured, immutable catalogs of network attractors.
//!
//! An [`AttractorCatalog`] is built from the raw stable states reported by a
//! [`StableStateSolver`](crate::solver::StableStateSolver) (or restored from the
//! [`AttractorCache`](crate::cache::AttractorCache)). Attractors are identified by their
//! 1-based position in the solver output.

#[cfg(test)]
mod tests;

use crate::state::{BooleanState, RawState, coerce_state};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("attractor {id} does not exist (the catalog contains {count} attractors)")]
    UnknownAttractorId { id: usize, count: usize },
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AttractorKind {
    FixedPoint,
    Cycle,
}

impl Display for AttractorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AttractorKind::FixedPoint => write!(f, "fixed point"),
            AttractorKind::Cycle => write!(f, "cycle"),
        }
    }
}

/// A single attractor of the catalog.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AttractorRecord {
    id: usize,
    kind: AttractorKind,
    states: Vec<BooleanState>,
    active_percentage: f64,
}

impl AttractorRecord {
    /// The 1-based identifier of this attractor.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn kind(&self) -> AttractorKind {
        self.kind
    }

    /// Member states of the attractor (exactly one for a fixed point).
    pub fn states(&self) -> &[BooleanState] {
        &self.states
    }

    /// The state used to describe the attractor (the first member state).
    pub fn representative(&self) -> &BooleanState {
        &self.states[0]
    }

    /// Percentage of network variables that are `true` in the representative state.
    pub fn active_percentage(&self) -> f64 {
        self.active_percentage
    }

    pub fn active_variables(&self) -> impl Iterator<Item = &str> {
        self.representative().active_variables().map(|it| it.as_str())
    }

    pub fn inactive_variables(&self) -> impl Iterator<Item = &str> {
        self.representative().inactive_variables().map(|it| it.as_str())
    }
}

/// One row of [`AttractorCatalog::summary_table`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SummaryRow {
    pub id: usize,
    pub kind: AttractorKind,
    pub active_percentage: f64,
}

impl Display for SummaryRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>4}  {:<12}  {:>6.1}%",
            self.id,
            self.kind.to_string(),
            self.active_percentage
        )
    }
}

/// How often a single variable is active across the catalog attractors.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VariableActivity {
    pub active_count: usize,
    pub total: usize,
    pub percentage: f64,
}

/// An ordered, immutable sequence of [`AttractorRecord`] objects.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct AttractorCatalog {
    records: Vec<AttractorRecord>,
}

impl AttractorCatalog {
    /// A catalog without any attractors.
    pub fn empty() -> AttractorCatalog {
        AttractorCatalog::default()
    }

    /// Build a catalog of fixed points from the raw stable states of a solver.
    ///
    /// The order of `states` determines attractor ids. Values are coerced with
    /// [`safe_coerce`](crate::state::safe_coerce) before anything is counted. The active
    /// percentage is relative to `total_variable_count` (the size of the model), not to the
    /// number of values in each state.
    pub fn from_stable_states(states: &[RawState], total_variable_count: usize) -> Self {
        let records: Vec<AttractorRecord> = states
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let state = coerce_state(raw);
                let active_percentage = percentage(state.count_active(), total_variable_count);
                AttractorRecord {
                    id: i + 1,
                    kind: AttractorKind::FixedPoint,
                    states: vec![state],
                    active_percentage,
                }
            })
            .collect();
        info!(
            "Built attractor catalog with {} fixed points over {} variables.",
            records.len(),
            total_variable_count
        );
        AttractorCatalog { records }
    }

    pub fn records(&self) -> &[AttractorRecord] {
        &self.records
    }

    /// Attractor with the given 1-based `id`.
    pub fn get(&self, id: usize) -> Result<&AttractorRecord, CatalogError> {
        id.checked_sub(1)
            .and_then(|index| self.records.get(index))
            .ok_or(CatalogError::UnknownAttractorId {
                id,
                count: self.count(),
            })
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fixed_point_count(&self) -> usize {
        self.count_kind(AttractorKind::FixedPoint)
    }

    pub fn cycle_count(&self) -> usize {
        self.count_kind(AttractorKind::Cycle)
    }

    fn count_kind(&self, kind: AttractorKind) -> usize {
        self.records.iter().filter(|it| it.kind == kind).count()
    }

    /// A read-only projection of the catalog for presentation.
    pub fn summary_table(&self) -> Vec<SummaryRow> {
        self.records
            .iter()
            .map(|it| SummaryRow {
                id: it.id,
                kind: it.kind,
                active_percentage: it.active_percentage,
            })
            .collect()
    }

    /// In how many attractors (by representative state) is `variable` active.
    pub fn variable_activity(&self, variable: &str) -> VariableActivity {
        let active_count = self
            .records
            .iter()
            .filter(|it| it.representative().get(variable).unwrap_or(false))
            .count();
        VariableActivity {
            active_count,
            total: self.count(),
            percentage: percentage(active_count, self.count()),
        }
    }

    /// Ids are `1..=count` in order and every record has member states consistent with
    /// its kind. Catalogs restored from external data must satisfy this before use.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.records.iter().enumerate().all(|(i, it)| {
            it.id == i + 1
                && match it.kind {
                    AttractorKind::FixedPoint => it.states.len() == 1,
                    AttractorKind::Cycle => !it.states.is_empty(),
                }
        })
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}
