use crate::log_set;
use crate::solver::{SolverError, StableStateSolver};
use crate::state::{RawState, RawValue, Variable};
use biodivine_lib_param_bn::biodivine_std::traits::Set;
use biodivine_lib_param_bn::symbolic_async_graph::{GraphColoredVertices, SymbolicAsyncGraph};
use biodivine_lib_param_bn::{BooleanNetwork, VariableId};
use cancel_this::{Cancellable, is_cancelled};
use log::{debug, info};
use std::time::Instant;

/// Computes fixed points symbolically: a state is a fixed point if no variable can change
/// its value in it, which is the same condition in synchronous and asynchronous semantics.
///
/// For parametrized networks, a state is reported if it is a fixed point for at least
/// one parametrization.
#[derive(Clone)]
pub struct SymbolicFixedPoints {
    network: BooleanNetwork,
    /// Stop enumerating after this many states (default: `usize::MAX`).
    pub max_states: usize,
}

impl From<BooleanNetwork> for SymbolicFixedPoints {
    fn from(value: BooleanNetwork) -> Self {
        SymbolicFixedPoints::new(value)
    }
}

impl SymbolicFixedPoints {
    pub fn new(network: BooleanNetwork) -> SymbolicFixedPoints {
        SymbolicFixedPoints {
            network,
            max_states: usize::MAX,
        }
    }

    pub fn with_max_states(mut self, max_states: usize) -> SymbolicFixedPoints {
        self.max_states = max_states;
        self
    }

    /// The symbolic set of all fixed points of `graph`.
    pub fn fixed_point_set(graph: &SymbolicAsyncGraph) -> Cancellable<GraphColoredVertices> {
        let mut candidates = graph.mk_unit_colored_vertices();
        for var in graph.variables() {
            is_cancelled!()?;
            let unstable = graph.var_can_post(var, &candidates);
            if !unstable.is_empty() {
                candidates = candidates.minus(&unstable);
                debug!("Removed states unstable in `{var}` ({}).", log_set(&candidates));
            }
        }
        Ok(candidates)
    }

    fn decode_vertex(
        &self,
        graph: &SymbolicAsyncGraph,
        variables: &[VariableId],
        vertex: &GraphColoredVertices,
    ) -> RawState {
        variables
            .iter()
            .map(|var| {
                let name = Variable::from(self.network.get_variable_name(*var).as_str());
                let positive = graph.mk_subspace(&[(*var, true)]);
                let value = !vertex.intersect(&positive).is_empty();
                (name, RawValue::Bool(value))
            })
            .collect()
    }
}

impl StableStateSolver for SymbolicFixedPoints {
    fn stable_states(&self) -> Result<Vec<RawState>, SolverError> {
        let start = Instant::now();
        let graph = SymbolicAsyncGraph::new(&self.network)
            .map_err(|e| SolverError::Unavailable(e.to_string()))?;
        let mut remaining = Self::fixed_point_set(&graph)
            .map_err(|e| SolverError::Unavailable(format!("fixed point search cancelled ({e})")))?;

        let variables: Vec<VariableId> = graph.variables().collect();
        let mut result = Vec::new();
        while !remaining.is_empty() && result.len() < self.max_states {
            let vertex = remaining.pick_vertex();
            result.push(self.decode_vertex(&graph, &variables, &vertex));
            remaining = remaining.minus(&vertex);
        }

        info!(
            "Found {} stable states in {:.2}s.",
            result.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(result)
    }
}
