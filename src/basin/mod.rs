//! Sampled basins of attraction.
//!
//! Enumerating the full basin of an attractor is exponential in the number of variables.
//! Instead, [`BasinGraphBuilder`] draws a bounded number of random initial states, simulates
//! their trajectories ([`TrajectorySimulation`]) and merges the results into a single
//! deduplicated [`BasinGraph`]. Trajectories that neither reach the target nor close a cycle
//! within the step budget are dropped.
//!
//! Simulations are independent and run in parallel. The merge is sequential and follows the
//! sampling order, so for a fixed random seed the resulting graph is always the same.

mod basin_graph;


pub use basin_graph::{BasinGraph, NodeTag, SampleStatistics};

use crate::log_state;
use crate::model::NetworkModel;
use crate::simulation::{
    DEFAULT_MAX_STEPS, SimulationConfig, SimulationOutcome, TrajectorySimulation,
};
use crate::state::BooleanState;
use cancel_this::{Cancellable, is_cancelled};
use computation_process::Algorithm;
use log::{info, warn};
use rand::Rng;
use rayon::prelude::*;
use std::sync::Arc;

/// Default number of sampled trajectories.
pub const DEFAULT_NUM_SAMPLES: usize = 20;

/// Samples trajectories of a [`NetworkModel`] and merges them into a [`BasinGraph`].
#[derive(Clone, Debug)]
pub struct BasinGraphBuilder {
    /// The sampled network.
    pub model: Arc<NetworkModel>,
    /// Number of random initial states (default: [`DEFAULT_NUM_SAMPLES`]).
    pub num_samples: usize,
    /// Step budget of each trajectory (default: [`DEFAULT_MAX_STEPS`]).
    pub max_steps: usize,
}

impl From<NetworkModel> for BasinGraphBuilder {
    fn from(value: NetworkModel) -> Self {
        BasinGraphBuilder::new(Arc::new(value))
    }
}

impl BasinGraphBuilder {
    pub fn new(model: Arc<NetworkModel>) -> BasinGraphBuilder {
        BasinGraphBuilder {
            model,
            num_samples: DEFAULT_NUM_SAMPLES,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_num_samples(mut self, num_samples: usize) -> BasinGraphBuilder {
        self.num_samples = num_samples;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> BasinGraphBuilder {
        self.max_steps = max_steps;
        self
    }

    /// Build a [`BasinGraph`] of `target` from `num_samples` random trajectories.
    ///
    /// All initial states are drawn from `rng` up front (one fair coin per variable, in
    /// variable name order); `rng` is not used afterward.
    ///
    /// Cancellation is only observed before and after the parallel simulation phase: rayon
    /// workers do not see the cancellation trigger of the calling thread, so a phase that has
    /// started (at most `num_samples * max_steps` updates) always runs to completion.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        target: &BooleanState,
        rng: &mut R,
    ) -> Cancellable<BasinGraph> {
        if !self.model.is_total(target) {
            warn!(
                "Basin target `{}` does not assign exactly the {} model variables.",
                target,
                self.model.num_vars()
            );
        }

        let target_key = target.key();
        let initial_states: Vec<BooleanState> = (0..self.num_samples)
            .map(|_| self.model.random_state(rng))
            .collect();

        info!(
            "Sampling {} trajectories of at most {} steps toward `{}` ({}).",
            initial_states.len(),
            self.max_steps,
            target_key,
            log_state(target)
        );

        let config = SimulationConfig::new(self.model.clone(), target_key.clone())
            .with_max_steps(self.max_steps);
        let outcomes: Vec<Cancellable<SimulationOutcome>> = initial_states
            .par_iter()
            .map(|state| TrajectorySimulation::run(config.clone(), state))
            .collect();

        let mut graph = BasinGraph::new(target_key);
        for outcome in outcomes {
            is_cancelled!()?;
            graph.merge(&outcome?);
        }

        let stats = graph.statistics();
        info!(
            "Basin sampling done: {} nodes, {} edges ({} reached, {} cycled, {} exhausted).",
            graph.node_count(),
            graph.edge_count(),
            stats.reached,
            stats.cycled,
            stats.exhausted
        );
        Ok(graph)
    }
}
