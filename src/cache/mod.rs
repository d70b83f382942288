//! Memoization of [`AttractorCatalog`] objects keyed by [`ModelFingerprint`].
//!
//! The cache is a thin layer over a [`CacheStore`] (a key to bytes store). Entries are
//! `serde_json` documents which record the format version, the fingerprint they belong to,
//! and the time they were created. Every problem with an entry (missing, unreadable,
//! malformed, foreign) is a cache miss; every problem with persisting an entry is logged and
//! otherwise ignored. The cache never turns an already computed catalog into an error.

mod store;

#[cfg(test)]
mod tests;

pub use store::{CacheStore, DirectoryStore, MAX_ENTRY_BYTES, MemoryStore};

use crate::catalog::AttractorCatalog;
use crate::fingerprint::ModelFingerprint;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// Version of the persisted entry layout. Entries with a different version are misses.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache store failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache entry is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("cache entry has format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("cache entry belongs to model `{found}`, expected `{expected}`")]
    FingerprintMismatch {
        expected: ModelFingerprint,
        found: ModelFingerprint,
    },
    #[error("cache entry contains an inconsistent attractor catalog")]
    Inconsistent,
}

/// The persisted form of a catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheEntry<C> {
    pub version: u32,
    pub fingerprint: ModelFingerprint,
    pub created_at: DateTime<Utc>,
    pub catalog: C,
}

/// Get-or-compute memoization of attractor catalogs backed by a [`CacheStore`].
pub struct AttractorCache<S: CacheStore> {
    store: S,
    enabled: bool,
}

impl<S: CacheStore> AttractorCache<S> {
    pub fn new(store: S) -> AttractorCache<S> {
        AttractorCache {
            store,
            enabled: true,
        }
    }

    /// A cache that never reads or writes `store`.
    pub fn disabled(store: S) -> AttractorCache<S> {
        AttractorCache {
            store,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The store key under which the catalog of `fingerprint` is persisted.
    pub fn entry_key(fingerprint: &ModelFingerprint) -> String {
        format!("attractors_{fingerprint}.json")
    }

    /// Read the catalog of `fingerprint`, or `None` if there is no usable entry.
    pub fn load(&self, fingerprint: &ModelFingerprint) -> Option<AttractorCatalog> {
        if !self.enabled {
            return None;
        }
        match self.try_load(fingerprint) {
            Ok(Some(catalog)) => {
                info!(
                    "Loaded {} cached attractors for model `{fingerprint}`.",
                    catalog.count()
                );
                Some(catalog)
            }
            Ok(None) => {
                debug!("No cached attractors for model `{fingerprint}`.");
                None
            }
            Err(error) => {
                warn!("Discarding cached attractors for model `{fingerprint}`: {error}");
                None
            }
        }
    }

    fn try_load(
        &self,
        fingerprint: &ModelFingerprint,
    ) -> Result<Option<AttractorCatalog>, CacheError> {
        let Some(bytes) = self.store.read(&Self::entry_key(fingerprint))? else {
            return Ok(None);
        };
        let entry: CacheEntry<AttractorCatalog> = serde_json::from_slice(&bytes)?;
        if entry.version != FORMAT_VERSION {
            return Err(CacheError::UnsupportedVersion {
                found: entry.version,
                expected: FORMAT_VERSION,
            });
        }
        if entry.fingerprint != *fingerprint {
            return Err(CacheError::FingerprintMismatch {
                expected: fingerprint.clone(),
                found: entry.fingerprint,
            });
        }
        if !entry.catalog.is_well_formed() {
            return Err(CacheError::Inconsistent);
        }
        debug!("Cache entry for `{fingerprint}` created at {}.", entry.created_at);
        Ok(Some(entry.catalog))
    }

    /// Persist `catalog` under `fingerprint`. Failures are logged, never returned.
    pub fn save(&self, fingerprint: &ModelFingerprint, catalog: &AttractorCatalog) {
        if !self.enabled {
            return;
        }
        match self.try_save(fingerprint, catalog) {
            Ok(()) => debug!("Saved {} attractors for `{fingerprint}`.", catalog.count()),
            Err(error) => warn!("Cannot cache attractors for model `{fingerprint}`: {error}"),
        }
    }

    fn try_save(
        &self,
        fingerprint: &ModelFingerprint,
        catalog: &AttractorCatalog,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry {
            version: FORMAT_VERSION,
            fingerprint: fingerprint.clone(),
            created_at: Utc::now(),
            catalog,
        };
        let bytes = serde_json::to_vec(&entry)?;
        self.store.write(&Self::entry_key(fingerprint), &bytes)?;
        Ok(())
    }

    /// Return the cached catalog of `fingerprint`, or compute, save and return a new one.
    pub fn get_or_compute<F>(&self, fingerprint: &ModelFingerprint, compute: F) -> AttractorCatalog
    where
        F: FnOnce() -> AttractorCatalog,
    {
        match self.get_or_try_compute(fingerprint, || Ok::<_, Infallible>(compute())) {
            Ok(catalog) => catalog,
            Err(never) => match never {},
        }
    }

    /// Same as [`AttractorCache::get_or_compute`], but a failed computation is returned
    /// to the caller and nothing is saved.
    pub fn get_or_try_compute<F, E>(
        &self,
        fingerprint: &ModelFingerprint,
        compute: F,
    ) -> Result<AttractorCatalog, E>
    where
        F: FnOnce() -> Result<AttractorCatalog, E>,
    {
        if let Some(catalog) = self.load(fingerprint) {
            return Ok(catalog);
        }
        let catalog = compute()?;
        self.save(fingerprint, &catalog);
        Ok(catalog)
    }
}
