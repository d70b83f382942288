use crate::simulation::{SimulationConfig, SimulationOutcome, TrajectoryState};
use cancel_this::is_cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::{debug, trace};

/// Performs one synchronous update of the [`TrajectoryState`] and checks whether the
/// trajectory reached the target or closed a cycle.
pub struct SynchronousStep;

impl ComputationStep<SimulationConfig, TrajectoryState, SimulationOutcome> for SynchronousStep {
    fn step(
        context: &SimulationConfig,
        state: &mut TrajectoryState,
    ) -> Completable<SimulationOutcome> {
        if state.step >= context.max_steps {
            debug!(
                "[step:{}] Trajectory exhausted after visiting {} states.",
                state.step,
                state.visited.len()
            );
            return Ok(SimulationOutcome::Exhausted {
                path: state.visited.clone(),
            });
        }

        is_cancelled!()?;
        state.step += 1;

        let next = context.model.successor(&state.current);
        let key = next.key();
        trace!("[step:{}] Moved to `{}`.", state.step, key);

        if key == context.target {
            debug!("[step:{}] Trajectory reached the target.", state.step);
            let mut path = state.visited.clone();
            path.push(key);
            return Ok(SimulationOutcome::ReachedTarget { path });
        }

        if let Some(position) = state.visited.iter().position(|it| *it == key) {
            let mut cycle = state.visited[position..].to_vec();
            cycle.push(key);
            debug!(
                "[step:{}] Trajectory closed a cycle of length {}.",
                state.step,
                cycle.len() - 1
            );
            return Ok(SimulationOutcome::DetectedCycle {
                cycle,
                path: state.visited.clone(),
            });
        }

        state.visited.push(key);
        state.current = next;
        Err(Suspended)
    }
}
