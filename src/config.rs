//! Configuration System
//!
//! Layered configuration for tch-compare: built-in defaults, the global config
//! file, an optional explicit file, then `TCH_COMPARE_*` environment variables.
//! CLI flags are applied on top by the binary.

use crate::attribution::OwnershipPolicy;
use crate::diff::DiffOptions;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Diff behaviour
    #[serde(default)]
    pub diff: DiffOptions,

    /// Package attribution behaviour
    #[serde(default)]
    pub attribution: AttributionConfig,

    /// Snapshot cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributionConfig {
    #[serde(default)]
    pub policy: OwnershipPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory; the platform cache directory when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Write freshly built snapshots to the cache
    #[serde(default = "default_true")]
    pub persist: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            persist: default_true(),
        }
    }
}
