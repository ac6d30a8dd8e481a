//! Metric configuration, loadable from TOML.
//!
//! ```toml
//! max_sentence_tokens = 70
//! aggregation = "optimal_assignment"
//! parse_workers = 8
//! comparison_timeout_ms = 60000
//! ```

use crate::aggregate::Aggregation;
use crate::error::{CassimError, CassimResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default token threshold of the length gate.
pub const DEFAULT_MAX_SENTENCE_TOKENS: usize = 70;

/// Configuration for the conversation driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CassimConfig {
    /// Sentences with more whitespace tokens than this gate the whole document.
    pub max_sentence_tokens: usize,
    /// How a cost matrix is reduced to a similarity.
    pub aggregation: Aggregation,
    /// Documents prepared (segmented and parsed) concurrently.
    /// This also bounds the number of in-flight parser requests.
    pub parse_workers: usize,
    /// Per-pair budget for building a cost matrix. `None` means unbounded.
    pub comparison_timeout_ms: Option<u64>,
}

impl Default for CassimConfig {
    fn default() -> Self {
        Self {
            max_sentence_tokens: DEFAULT_MAX_SENTENCE_TOKENS,
            aggregation: Aggregation::default(),
            parse_workers: 4,
            comparison_timeout_ms: None,
        }
    }
}

impl CassimConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> CassimResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CassimError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> CassimResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CassimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CassimResult<()> {
        if self.max_sentence_tokens == 0 {
            return Err(CassimError::config("max_sentence_tokens must be > 0"));
        }
        if self.parse_workers == 0 {
            return Err(CassimError::config("parse_workers must be > 0"));
        }
        if self.comparison_timeout_ms == Some(0) {
            return Err(CassimError::config("comparison_timeout_ms must be > 0 when set"));
        }
        Ok(())
    }

    pub fn comparison_timeout(&self) -> Option<Duration> {
        self.comparison_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_max_sentence_tokens(mut self, limit: usize) -> Self {
        self.max_sentence_tokens = limit;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_parse_workers(mut self, workers: usize) -> Self {
        self.parse_workers = workers;
        self
    }

    pub fn with_comparison_timeout(mut self, timeout: Duration) -> Self {
        self.comparison_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }
}
