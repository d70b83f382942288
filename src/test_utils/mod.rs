pub mod example_networks;

use crate::model::NetworkModel;
use crate::state::{BooleanState, RawState, RawValue};

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Creates a state of `model` from a state number.
///
/// The state number is interpreted as binary encoding (the most significant bit = the first
/// variable in name order). The number of variables is inferred from the model.
///
/// # Example
///
/// For a model over `{A, B, C}`:
/// - `mk_state(model, 0)` creates state `A=0,B=0,C=0`
/// - `mk_state(model, 5)` creates state `A=1,B=0,C=1`
pub fn mk_state(model: &NetworkModel, state: u32) -> BooleanState {
    let num_vars = model.num_vars();
    assert!(
        state < (1u32 << num_vars),
        "State {} out of range for {} variables",
        state,
        num_vars
    );
    model
        .variables()
        .enumerate()
        .map(|(i, var)| {
            let shift = num_vars - 1 - i;
            (var.clone(), (state >> shift) & 1 == 1)
        })
        .collect()
}

/// All states of `model`, in the order of their state numbers. Up to 16 variables.
pub fn all_states(model: &NetworkModel) -> Vec<BooleanState> {
    assert!(model.num_vars() <= 16);
    (0..(1u32 << model.num_vars()))
        .map(|it| mk_state(model, it))
        .collect()
}

/// A raw (solver-like) state with crisp values.
pub fn mk_raw_state(values: &[(&str, bool)]) -> RawState {
    values
        .iter()
        .map(|(name, value)| ((*name).into(), RawValue::Bool(*value)))
        .collect()
}
