//! The top-level analysis flows.
//!
//! [`analyze_attractors`] produces the [`AttractorCatalog`] of a model (through the
//! [`AttractorCache`]), and [`attractor_basin`] samples the [`BasinGraph`] of one attractor
//! of such a catalog. Both are configured by an [`AnalysisConfig`].
//!
//! [`knockouts`] and [`controllability`] compare the catalogs of modified versions of a model.
//! They always run the solver directly, since a modified model has the same cache key as the
//! model it was derived from.

mod analysis_config;
mod knockouts;
mod phenotype;

#[cfg(test)]
mod tests;

pub use analysis_config::{AnalysisConfig, DEFAULT_CACHE_DIR};
pub use knockouts::{
    DEFAULT_MARKERS, KnockoutReport, KnockoutRow, controllability, knockouts, marker_activity,
};
pub use phenotype::{
    DEFAULT_PHENOTYPE_THRESHOLD, PHENOTYPE_MARKERS, is_cell_division_phenotype,
};

use crate::basin::{BasinGraph, BasinGraphBuilder};
use crate::cache::{AttractorCache, CacheStore, DirectoryStore};
use crate::catalog::{AttractorCatalog, CatalogError};
use crate::model::NetworkModel;
use crate::simple_type_name;
use crate::solver::{SolverError, StableStateSolver};
use cancel_this::Cancelled;
use log::{info, warn};
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    UnknownAttractor(#[from] CatalogError),
    #[error("analysis was cancelled: {0}")]
    Cancelled(Cancelled),
}

impl From<Cancelled> for AnalysisError {
    fn from(value: Cancelled) -> Self {
        AnalysisError::Cancelled(value)
    }
}

/// Open the directory-backed attractor cache described by `config`.
///
/// When `use_cache` is off, the returned cache never touches the directory.
pub fn open_cache(config: &AnalysisConfig) -> AttractorCache<DirectoryStore> {
    let store = DirectoryStore::new(config.cache_dir.clone());
    if config.use_cache {
        AttractorCache::new(store)
    } else {
        AttractorCache::disabled(store)
    }
}

/// Compute (or load) the attractor catalog of `model`.
///
/// On a cache miss, the stable states of `solver` are turned into a fresh catalog which is then
/// saved. A failing solver, or one that finds no stable states, results in an empty catalog
/// that is not saved.
///
/// Cache entries are keyed by the variable names of `model` only. Models derived with
/// [`NetworkModel::force`] or [`NetworkModel::knockout`] share the key of the model they were
/// derived from, so they must be analysed with [`analyze_attractors_uncached`] (as
/// [`knockouts`] and [`controllability`] do).
pub fn analyze_attractors<P, S>(
    model: &NetworkModel,
    solver: &P,
    cache: &AttractorCache<S>,
) -> AttractorCatalog
where
    P: StableStateSolver + ?Sized,
    S: CacheStore,
{
    let fingerprint = model.fingerprint();
    let result = cache.get_or_try_compute(&fingerprint, || compute_catalog(model, solver));
    result.unwrap_or_else(|error| {
        warn!("No attractors for model `{fingerprint}`: {error}");
        AttractorCatalog::empty()
    })
}

/// Compute the attractor catalog of `model` without consulting any cache.
///
/// Solver failures result in an empty catalog, same as in [`analyze_attractors`].
pub fn analyze_attractors_uncached<P>(model: &NetworkModel, solver: &P) -> AttractorCatalog
where
    P: StableStateSolver + ?Sized,
{
    compute_catalog(model, solver).unwrap_or_else(|error| {
        warn!("No attractors for model `{}`: {error}", model.fingerprint());
        AttractorCatalog::empty()
    })
}

fn compute_catalog<P>(model: &NetworkModel, solver: &P) -> Result<AttractorCatalog, SolverError>
where
    P: StableStateSolver + ?Sized,
{
    info!(
        "Computing stable states of {} variables using `{}`.",
        model.num_vars(),
        simple_type_name::<P>()
    );
    let start = Instant::now();
    let states = solver.stable_states()?;
    if states.is_empty() {
        return Err(SolverError::Unavailable("no stable states found".to_string()));
    }
    info!(
        "Solver found {} stable states in {:.2}s.",
        states.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(AttractorCatalog::from_stable_states(&states, model.num_vars()))
}

/// Sample the basin of the attractor `id` of `catalog`.
///
/// The representative state of the attractor is the target. The number of trajectories and
/// their length are given by `config.max_states` and `config.max_steps`.
pub fn attractor_basin<R: Rng + ?Sized>(
    model: Arc<NetworkModel>,
    catalog: &AttractorCatalog,
    id: usize,
    config: &AnalysisConfig,
    rng: &mut R,
) -> Result<BasinGraph, AnalysisError> {
    let record = catalog.get(id)?;
    info!(
        "Sampling basin of attractor {} ({}, {:.1}% active).",
        record.id(),
        record.kind(),
        record.active_percentage()
    );
    let graph = BasinGraphBuilder::new(model)
        .with_num_samples(config.max_states)
        .with_max_steps(config.max_steps)
        .sample(record.representative(), rng)?;
    Ok(graph)
}
