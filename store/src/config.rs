//! Store configuration.
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! max_hierarchy_depth = 5
//! max_filter_depth = 5
//! hydration_depth = 2
//! default_deadline_ms = 10000
//! id_generation_attempts = 8
//! ```

use inv_compiler::DEFAULT_MAX_FILTER_DEPTH;
use inv_hierarchy::DEFAULT_MAX_HIERARCHY_DEPTH;
use inv_mutation::{MutationConfig, DEFAULT_ID_GENERATION_ATTEMPTS};
use inv_query::{QueryConfig, DEFAULT_HYDRATION_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Limits and defaults of an [`crate::InventoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Deepest allowed nesting of hierarchical kinds.
    pub max_hierarchy_depth: usize,
    /// Most edge hops a filter path may take.
    pub max_filter_depth: usize,
    /// Link levels eager-loaded into results.
    pub hydration_depth: usize,
    /// Deadline applied when a request carries none.
    pub default_deadline_ms: u64,
    pub id_generation_attempts: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
            max_filter_depth: DEFAULT_MAX_FILTER_DEPTH,
            hydration_depth: DEFAULT_HYDRATION_DEPTH,
            default_deadline_ms: 10_000,
            id_generation_attempts: DEFAULT_ID_GENERATION_ATTEMPTS,
        }
    }
}

impl StoreConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("max_hierarchy_depth", self.max_hierarchy_depth),
            ("max_filter_depth", self.max_filter_depth),
            ("id_generation_attempts", self.id_generation_attempts),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        if self.default_deadline_ms == 0 {
            return Err(ConfigError::Zero {
                field: "default_deadline_ms",
            });
        }
        Ok(())
    }

    pub fn default_deadline(&self) -> Duration {
        Duration::from_millis(self.default_deadline_ms)
    }

    pub(crate) fn mutation(&self) -> MutationConfig {
        MutationConfig {
            max_hierarchy_depth: self.max_hierarchy_depth,
            id_generation_attempts: self.id_generation_attempts,
        }
    }

    pub(crate) fn query(&self) -> QueryConfig {
        QueryConfig {
            max_filter_depth: self.max_filter_depth,
            hydration_depth: self.hydration_depth,
            max_hierarchy_depth: self.max_hierarchy_depth,
        }
    }
}
