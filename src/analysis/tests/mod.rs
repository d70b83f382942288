
use crate::analysis::{
    AnalysisConfig, AnalysisError, DEFAULT_CACHE_DIR, analyze_attractors,
    analyze_attractors_uncached, attractor_basin, open_cache,
};
use crate::basin::NodeTag;
use crate::cache::{AttractorCache, CacheStore, MemoryStore};
use crate::catalog::{AttractorCatalog, CatalogError};
use crate::solver::{ModelFixedPoints, SolverError, SymbolicFixedPoints};
use crate::state::{BooleanState, RawState};
use crate::test_utils::example_networks::{CASCADE_AEON, cascade, parse_aeon};
use crate::test_utils::{init_logger, mk_raw_state};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::Cell;
use std::path::PathBuf;
use std::sync::Arc;

fn cascade_solver() -> impl Fn() -> Result<Vec<RawState>, SolverError> {
    || Ok(vec![mk_raw_state(&[("A", true), ("B", true), ("C", true)])])
}

#[test]
fn default_config() {
    let config = AnalysisConfig::default();
    assert!(config.use_cache);
    assert_eq!(config.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
    assert_eq!(config.max_states, 20);
    assert_eq!(config.max_steps, 100);

    let config = AnalysisConfig::from(PathBuf::from("/tmp/basins"))
        .without_cache()
        .with_max_states(5)
        .with_max_steps(7);
    assert!(!config.use_cache);
    assert_eq!(config.cache_dir, PathBuf::from("/tmp/basins"));
    assert_eq!(config.max_states, 5);
    assert_eq!(config.max_steps, 7);
}

#[test]
fn end_to_end_cascade() -> Result<(), AnalysisError> {
    init_logger();
    let model = Arc::new(cascade());
    let cache = AttractorCache::new(MemoryStore::new());
    let catalog = analyze_attractors(&model, &cascade_solver(), &cache);
    assert_eq!(catalog.count(), 1);
    let record = catalog.get(1)?;
    assert_eq!(record.active_percentage(), 100.0);
    assert_eq!(
        record.representative(),
        &BooleanState::from([("A", true), ("B", true), ("C", true)])
    );

    let config = AnalysisConfig::new().without_cache().with_max_states(25);
    let mut rng = StdRng::seed_from_u64(1);
    let graph = attractor_basin(model, &catalog, 1, &config, &mut rng)?;
    assert_eq!(graph.statistics().reached, 25);
    assert_eq!(graph.tag(&record.representative().key()), Some(NodeTag::Target));
    Ok(())
}

#[test]
fn symbolic_solver_end_to_end() -> Result<(), AnalysisError> {
    init_logger();
    let network = parse_aeon(CASCADE_AEON);
    let model = Arc::new(crate::model::NetworkModel::from(&network));
    let cache = AttractorCache::new(MemoryStore::new());
    let catalog = analyze_attractors(&model, &SymbolicFixedPoints::from(network), &cache);
    assert_eq!(catalog.fixed_point_count(), 1);
    let mut rng = StdRng::seed_from_u64(9);
    let graph = attractor_basin(model, &catalog, 1, &AnalysisConfig::new(), &mut rng)?;
    assert_eq!(graph.statistics().reached, 20);
    Ok(())
}

#[test]
fn unknown_attractor_is_reported() {
    init_logger();
    let model = Arc::new(cascade());
    let cache = AttractorCache::new(MemoryStore::new());
    let catalog = analyze_attractors(&model, &cascade_solver(), &cache);
    let mut rng = StdRng::seed_from_u64(1);
    let config = AnalysisConfig::new();
    let error = attractor_basin(model, &catalog, 2, &config, &mut rng).unwrap_err();
    assert!(matches!(
        error,
        AnalysisError::UnknownAttractor(CatalogError::UnknownAttractorId { id: 2, count: 1 })
    ));
}

#[test]
fn second_analysis_uses_cache() {
    init_logger();
    let model = cascade();
    let cache = AttractorCache::new(MemoryStore::new());
    let calls = Cell::new(0);
    let solver = || {
        calls.set(calls.get() + 1);
        cascade_solver()()
    };
    let first = analyze_attractors(&model, &solver, &cache);
    let second = analyze_attractors(&model, &solver, &cache);
    assert_eq!(first, second);
    assert_eq!(calls.get(), 1);
}

#[test]
fn knockout_catalog_is_computed_not_cached() {
    init_logger();
    let model = cascade();
    let cache = AttractorCache::new(MemoryStore::new());
    let wild_type = analyze_attractors(&model, &cascade_solver(), &cache);
    assert_eq!(cache.store().len(), 1);

    let knockout = model.knockout("C");
    let calls = Cell::new(0);
    let solver = || -> Result<Vec<RawState>, SolverError> {
        calls.set(calls.get() + 1);
        Ok(vec![mk_raw_state(&[("A", true), ("B", true), ("C", false)])])
    };
    let catalog = analyze_attractors_uncached(&knockout, &solver);
    assert_eq!(calls.get(), 1);
    assert_eq!(catalog.count(), 1);
    let representative = catalog.get(1).unwrap().representative();
    assert_eq!(
        representative,
        &BooleanState::from([("A", true), ("B", true), ("C", false)])
    );
    assert_eq!(&knockout.successor(representative), representative);

    // The same holds with the model-based solver, and the wild-type entry is untouched.
    let solved = analyze_attractors_uncached(&knockout, &ModelFixedPoints::new(knockout.clone()));
    assert_eq!(solved, catalog);
    assert_eq!(cache.store().len(), 1);
    assert_eq!(analyze_attractors(&model, &cascade_solver(), &cache), wild_type);
}

#[test]
fn uncached_analysis_of_failing_solver_is_empty() {
    init_logger();
    let failing = || -> Result<Vec<RawState>, SolverError> {
        Err(SolverError::Unavailable("solver crashed".to_string()))
    };
    assert!(analyze_attractors_uncached(&cascade(), &failing).is_empty());
}

#[test]
fn solver_failure_gives_empty_catalog() {
    init_logger();
    let model = cascade();
    let cache = AttractorCache::new(MemoryStore::new());
    let failing = || -> Result<Vec<RawState>, SolverError> {
        Err(SolverError::Unavailable("solver crashed".to_string()))
    };
    let catalog = analyze_attractors(&model, &failing, &cache);
    assert!(catalog.is_empty());
    assert_eq!(catalog.summary_table().len(), 0);
    assert!(cache.store().is_empty());

    // Failures are not cached: a working solver is consulted next time.
    let catalog = analyze_attractors(&model, &cascade_solver(), &cache);
    assert_eq!(catalog.count(), 1);
}

#[test]
fn no_stable_states_gives_empty_catalog() {
    init_logger();
    let model = cascade();
    let cache = AttractorCache::new(MemoryStore::new());
    let nothing = || -> Result<Vec<RawState>, SolverError> { Ok(Vec::new()) };
    let catalog = analyze_attractors(&model, &nothing, &cache);
    assert_eq!(catalog, AttractorCatalog::empty());
    assert!(cache.store().is_empty());

    let mut rng = StdRng::seed_from_u64(1);
    let error = attractor_basin(
        Arc::new(model),
        &catalog,
        1,
        &AnalysisConfig::new(),
        &mut rng,
    );
    assert!(error.is_err());
}

#[test]
fn open_cache_respects_config() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let model = cascade();
    let key = AttractorCache::<MemoryStore>::entry_key(&model.fingerprint());

    let disabled = open_cache(&AnalysisConfig::from(dir.path().to_path_buf()).without_cache());
    assert!(!disabled.is_enabled());
    analyze_attractors(&model, &cascade_solver(), &disabled);
    assert!(!dir.path().join(&key).exists());

    let enabled = open_cache(&AnalysisConfig::from(dir.path().to_path_buf()));
    assert!(enabled.is_enabled());
    analyze_attractors(&model, &cascade_solver(), &enabled);
    assert!(dir.path().join(&key).exists());
    assert!(enabled.store().read(&key).unwrap().is_some());
}
