use crate::basin::DEFAULT_NUM_SAMPLES;
use crate::simulation::DEFAULT_MAX_STEPS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the attractor cache, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "./cache";

/// A configuration object for the top-level analysis flows.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Read and write computed attractor catalogs through the cache (default: `true`).
    pub use_cache: bool,
    /// Directory of the attractor cache (default: [`DEFAULT_CACHE_DIR`]).
    pub cache_dir: PathBuf,
    /// Number of trajectories sampled for a basin graph (default: [`DEFAULT_NUM_SAMPLES`]).
    pub max_states: usize,
    /// Step budget of each sampled trajectory (default: [`DEFAULT_MAX_STEPS`]).
    pub max_steps: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            use_cache: true,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            max_states: DEFAULT_NUM_SAMPLES,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl From<PathBuf> for AnalysisConfig {
    fn from(value: PathBuf) -> Self {
        AnalysisConfig::new().with_cache_dir(value)
    }
}

impl AnalysisConfig {
    pub fn new() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> AnalysisConfig {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn without_cache(mut self) -> AnalysisConfig {
        self.use_cache = false;
        self
    }

    pub fn with_max_states(mut self, max_states: usize) -> AnalysisConfig {
        self.max_states = max_states;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> AnalysisConfig {
        self.max_steps = max_steps;
        self
    }
}
