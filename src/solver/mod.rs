//! Sources of stable states (fixed points).
//!
//! The engine does not compute stable states itself; it consumes them through the
//! [`StableStateSolver`] trait. [`SymbolicFixedPoints`] is the default implementation, based
//! on the symbolic transition graph of `biodivine_lib_param_bn`. [`ModelFixedPoints`] works
//! directly on a [`NetworkModel`](crate::model::NetworkModel), which is what modified
//! (forced or knocked-out) models need.

mod model_fixed_points;
mod symbolic_fixed_points;


pub use model_fixed_points::ModelFixedPoints;
pub use symbolic_fixed_points::SymbolicFixedPoints;

use crate::state::RawState;

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SolverError {
    #[error("stable state solver is unavailable: {0}")]
    Unavailable(String),
}

/// Computes the stable states of a network.
///
/// An empty result is a valid answer ("no stable states found"). Errors are reported to
/// the caller, which typically treats them the same way as an empty result.
pub trait StableStateSolver {
    fn stable_states(&self) -> Result<Vec<RawState>, SolverError>;
}

impl<F> StableStateSolver for F
where
    F: Fn() -> Result<Vec<RawState>, SolverError>,
{
    fn stable_states(&self) -> Result<Vec<RawState>, SolverError> {
        self()
    }
}
