//! Configuration for the orchestration layer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the [`crate::Orchestrator`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Deadline for every upstream call, primary and secondary alike
    /// (milliseconds). Exceeding it is treated like a non-2xx response.
    pub call_timeout_ms: u64,

    /// Number of search hits requested when the caller does not say
    pub default_search_k: usize,
}

impl PipelineConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_ms == 0 {
            return Err("call_timeout_ms must be greater than 0".to_string());
        }
        if self.default_search_k == 0 {
            return Err("default_search_k must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 5_000,
            default_search_k: 5,
        }
    }
}
