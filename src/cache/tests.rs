use crate::cache::{
    AttractorCache, CacheEntry, CacheStore, DirectoryStore, FORMAT_VERSION, MemoryStore,
};
use crate::catalog::AttractorCatalog;
use crate::fingerprint::ModelFingerprint;
use crate::test_utils::{init_logger, mk_raw_state};
use chrono::Utc;
use std::cell::Cell;
use std::io;

fn example_catalog() -> AttractorCatalog {
    let states = vec![
        mk_raw_state(&[("A", true), ("B", true), ("C", false)]),
        mk_raw_state(&[("A", false), ("B", false), ("C", true)]),
    ];
    AttractorCatalog::from_stable_states(&states, 3)
}

fn example_fingerprint() -> ModelFingerprint {
    ModelFingerprint::compute(["A", "B", "C"])
}

/// A store that fails every operation.
struct BrokenStore;

impl CacheStore for BrokenStore {
    fn read(&self, _key: &str) -> io::Result<Option<Vec<u8>>> {
        Err(io::Error::other("read failure"))
    }

    fn write(&self, _key: &str, _bytes: &[u8]) -> io::Result<()> {
        Err(io::Error::other("write failure"))
    }
}

#[test]
fn memory_round_trip() {
    init_logger();
    let cache = AttractorCache::new(MemoryStore::new());
    let fingerprint = example_fingerprint();
    let catalog = example_catalog();
    assert_eq!(cache.load(&fingerprint), None);
    cache.save(&fingerprint, &catalog);
    assert_eq!(cache.store().len(), 1);
    assert_eq!(cache.load(&fingerprint), Some(catalog));
}

#[test]
fn directory_round_trip_across_instances() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let fingerprint = example_fingerprint();
    let catalog = example_catalog();

    // The directory does not exist until the first write.
    let cache_dir = dir.path().join("nested").join("cache");
    AttractorCache::new(DirectoryStore::new(&cache_dir)).save(&fingerprint, &catalog);

    let restored = AttractorCache::new(DirectoryStore::new(&cache_dir))
        .load(&fingerprint)
        .unwrap();
    assert_eq!(restored.count(), catalog.count());
    for (a, b) in restored.records().iter().zip(catalog.records()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.active_percentage(), b.active_percentage());
        assert_eq!(a.states(), b.states());
    }

    // Only the entry itself remains in the directory.
    let files: Vec<String> = std::fs::read_dir(&cache_dir)
        .unwrap()
        .map(|it| it.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files, vec![format!("attractors_{fingerprint}.json")]);
}

#[test]
fn missing_directory_is_a_miss() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let cache = AttractorCache::new(DirectoryStore::new(dir.path().join("missing")));
    assert_eq!(cache.load(&example_fingerprint()), None);
}

#[test]
fn corrupt_entry_is_a_miss() {
    init_logger();
    let fingerprint = example_fingerprint();
    let key = AttractorCache::<MemoryStore>::entry_key(&fingerprint);
    let store = MemoryStore::new();
    store.write(&key, b"{ not json").unwrap();
    let cache = AttractorCache::new(store);
    assert_eq!(cache.load(&fingerprint), None);

    // A miss caused by a corrupt entry is recomputed and overwritten.
    let catalog = cache.get_or_compute(&fingerprint, example_catalog);
    assert_eq!(cache.load(&fingerprint), Some(catalog));
}

#[test]
fn foreign_entries_are_misses() {
    init_logger();
    let fingerprint = example_fingerprint();
    let other = ModelFingerprint::compute(["A", "B"]);
    let key = AttractorCache::<MemoryStore>::entry_key(&fingerprint);

    let store = MemoryStore::new();
    let entry = CacheEntry {
        version: FORMAT_VERSION,
        fingerprint: other,
        created_at: Utc::now(),
        catalog: example_catalog(),
    };
    store.write(&key, &serde_json::to_vec(&entry).unwrap()).unwrap();
    let cache = AttractorCache::new(store);
    assert_eq!(cache.load(&fingerprint), None);

    let entry = CacheEntry {
        version: FORMAT_VERSION + 1,
        fingerprint: fingerprint.clone(),
        created_at: Utc::now(),
        catalog: example_catalog(),
    };
    cache
        .store()
        .write(&key, &serde_json::to_vec(&entry).unwrap())
        .unwrap();
    assert_eq!(cache.load(&fingerprint), None);
}

#[test]
fn get_or_compute_memoizes() {
    init_logger();
    let cache = AttractorCache::new(MemoryStore::new());
    let fingerprint = example_fingerprint();
    let calls = Cell::new(0);
    let compute = || {
        calls.set(calls.get() + 1);
        example_catalog()
    };
    let first = cache.get_or_compute(&fingerprint, compute);
    let second = cache.get_or_compute(&fingerprint, compute);
    assert_eq!(first, second);
    assert_eq!(calls.get(), 1);
}

#[test]
fn failed_computation_is_not_saved() {
    init_logger();
    let cache = AttractorCache::new(MemoryStore::new());
    let fingerprint = example_fingerprint();
    let result = cache.get_or_try_compute(&fingerprint, || Err::<AttractorCatalog, _>("failed"));
    assert_eq!(result, Err("failed"));
    assert!(cache.store().is_empty());
}

#[test]
fn disabled_cache_never_touches_store() {
    init_logger();
    let fingerprint = example_fingerprint();
    let store = MemoryStore::new();
    let key = AttractorCache::<MemoryStore>::entry_key(&fingerprint);
    let entry = CacheEntry {
        version: FORMAT_VERSION,
        fingerprint: fingerprint.clone(),
        created_at: Utc::now(),
        catalog: example_catalog(),
    };
    store.write(&key, &serde_json::to_vec(&entry).unwrap()).unwrap();

    let cache = AttractorCache::disabled(store);
    assert!(!cache.is_enabled());
    assert_eq!(cache.load(&fingerprint), None);
    let computed = cache.get_or_compute(&fingerprint, AttractorCatalog::empty);
    assert!(computed.is_empty());
    // The original entry is still there.
    let bytes = cache.store().read(&key).unwrap().unwrap();
    let stored: CacheEntry<AttractorCatalog> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stored.catalog, example_catalog());
}

#[test]
fn broken_store_does_not_affect_result() {
    init_logger();
    let cache = AttractorCache::new(BrokenStore);
    let fingerprint = example_fingerprint();
    assert_eq!(cache.load(&fingerprint), None);
    let catalog = cache.get_or_compute(&fingerprint, example_catalog);
    assert_eq!(catalog, example_catalog());
}

#[test]
fn oversized_entry_is_rejected() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::new(dir.path());
    store.write("entry", &[0u8; 64]).unwrap();
    assert_eq!(store.read("entry").unwrap(), Some(vec![0u8; 64]));

    store.max_entry_bytes = 16;
    let error = store.read("entry").unwrap_err();
    assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    assert_eq!(store.read("other").unwrap(), None);
}

#[test]
fn directory_writes_replace_entries() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path());
    store.write("entry", b"first").unwrap();
    store.write("entry", b"second").unwrap();
    assert_eq!(store.read("entry").unwrap(), Some(b"second".to_vec()));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
