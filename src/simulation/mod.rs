//! Deterministic synchronous simulation of a single trajectory.
//!
//! A trajectory starts in an initial state and repeatedly applies the synchronous update
//! ([`NetworkModel::successor`]). Each update is one step of a [`TrajectorySimulation`]
//! computation (and a cancellation point). The computation ends with a [`SimulationOutcome`]:
//!
//! - [`SimulationOutcome::ReachedTarget`] when the update produces the target state,
//! - [`SimulationOutcome::DetectedCycle`] when the update produces a state that was already
//!   visited,
//! - [`SimulationOutcome::Exhausted`] when neither happens within `max_steps` updates.
//!
//! The target check always precedes the cycle check, so a trajectory that re-enters the target
//! counts as reaching it. Only states visited *before* the current update participate in the
//! cycle check; hence a non-target fixed point is reported as a cycle of length one.
//!
//! ```no_run
//! use biodivine_algo_basins::model::NetworkModel;
//! use biodivine_algo_basins::simulation::{SimulationConfig, TrajectorySimulation};
//! use biodivine_algo_basins::state::{BooleanState, Expr};
//! use computation_process::Algorithm;
//! use std::sync::Arc;
//!
//! let model = NetworkModel::new()
//!     .with_constant("A", true)
//!     .with_rule("B", Expr::var("A"));
//! let target = BooleanState::from([("A", true), ("B", true)]);
//! let initial = BooleanState::from([("A", false), ("B", false)]);
//!
//! let config = SimulationConfig::new(Arc::new(model), target.key());
//! let outcome = TrajectorySimulation::run(config, &initial).unwrap();
//! assert!(outcome.is_reached());
//! ```

mod synchronous_step;


use crate::model::NetworkModel;
use crate::state::{BooleanState, CanonicalKey};
use cancel_this::Cancellable;
use computation_process::{Algorithm, Computation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
pub use synchronous_step::SynchronousStep;

/// Default cap on the number of synchronous updates of one trajectory.
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Simulate one trajectory until it reaches the target, cycles, or runs out of steps.
pub type TrajectorySimulation =
    Computation<SimulationConfig, TrajectoryState, SimulationOutcome, SynchronousStep>;

/// A configuration object for a [`TrajectorySimulation`].
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// The simulated network. It is never modified by the simulation.
    pub model: Arc<NetworkModel>,
    /// Key of the state that ends the simulation successfully.
    pub target: CanonicalKey,
    /// The simulation ends with [`SimulationOutcome::Exhausted`] once it performed this many
    /// updates (default: [`DEFAULT_MAX_STEPS`]).
    pub max_steps: usize,
}

impl SimulationConfig {
    pub fn new(model: Arc<NetworkModel>, target: CanonicalKey) -> SimulationConfig {
        SimulationConfig {
            model,
            target,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> SimulationConfig {
        self.max_steps = max_steps;
        self
    }
}

/// Internal state of a [`TrajectorySimulation`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TrajectoryState {
    /// Number of updates performed so far.
    pub step: usize,
    /// The most recently visited state.
    pub current: BooleanState,
    /// Keys of all visited states, in visit order.
    pub visited: Vec<CanonicalKey>,
}

impl From<BooleanState> for TrajectoryState {
    fn from(value: BooleanState) -> Self {
        TrajectoryState {
            step: 0,
            visited: vec![value.key()],
            current: value,
        }
    }
}

impl From<&BooleanState> for TrajectoryState {
    fn from(value: &BooleanState) -> Self {
        TrajectoryState::from(value.clone())
    }
}

/// The result of a [`TrajectorySimulation`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SimulationOutcome {
    /// The trajectory reached the target. `path` starts with the initial state and ends
    /// with the target.
    ReachedTarget { path: Vec<CanonicalKey> },
    /// The trajectory revisited a state. `cycle` is the closed walk through the cycle
    /// (its first state is repeated at the end), `path` is everything visited before
    /// the repeated state was produced.
    DetectedCycle {
        cycle: Vec<CanonicalKey>,
        path: Vec<CanonicalKey>,
    },
    /// The step budget ran out. `path` contains all visited states.
    Exhausted { path: Vec<CanonicalKey> },
}

impl SimulationOutcome {
    pub fn path(&self) -> &[CanonicalKey] {
        match self {
            SimulationOutcome::ReachedTarget { path } => path,
            SimulationOutcome::DetectedCycle { path, .. } => path,
            SimulationOutcome::Exhausted { path } => path,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, SimulationOutcome::ReachedTarget { .. })
    }

    /// Number of distinct states on the detected cycle (`None` for other outcomes and for
    /// an empty cycle).
    pub fn cycle_length(&self) -> Option<usize> {
        match self {
            SimulationOutcome::DetectedCycle { cycle, .. } => cycle.len().checked_sub(1),
            _ => None,
        }
    }
}

/// Run a single [`TrajectorySimulation`] from `initial` to completion.
pub fn simulate(
    model: Arc<NetworkModel>,
    initial: &BooleanState,
    target: &CanonicalKey,
    max_steps: usize,
) -> Cancellable<SimulationOutcome> {
    let config = SimulationConfig::new(model, target.clone()).with_max_steps(max_steps);
    TrajectorySimulation::run(config, initial)
}
