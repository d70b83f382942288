use crate::state::BooleanState;
use biodivine_lib_param_bn::symbolic_async_graph::GraphColoredVertices;

#[cfg(test)]
mod test_utils;

pub mod analysis;
pub mod basin;
pub mod cache;
pub mod catalog;
pub mod fingerprint;
pub mod model;
pub mod simulation;
pub mod solver;
pub mod state;

/// A utility method for printing useful metadata of symbolic sets.
fn log_set(set: &GraphColoredVertices) -> String {
    format!(
        "elements={}; BDD nodes={}",
        set.exact_cardinality(),
        set.symbolic_size()
    )
}

/// A utility method for printing a short summary of a (possibly large) state.
fn log_state(state: &BooleanState) -> String {
    format!("variables={}; active={}", state.len(), state.count_active())
}

/// Extract the "simple name" of a type argument at compile time.
fn simple_type_name<T: ?Sized>() -> &'static str {
    std::any::type_name::<T>().split("::").last().unwrap_or("?")
}
