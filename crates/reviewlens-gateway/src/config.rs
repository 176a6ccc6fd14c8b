//! Configuration file parsing for the Gateway.
//!
//! Loads settings from TOML files: bind address, the upstream model
//! service origin, the per-call timeout, and aggregation window sizes.

use reviewlens_pipeline::PipelineConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Gateway configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing or invalid required field
    #[error("Invalid configuration field: {0}")]
    InvalidField(String),
}

/// Gateway configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8090)
    pub bind_port: u16,

    /// Origin of the upstream model service (e.g., "http://backend:8080")
    pub upstream_base_url: String,

    /// Deadline for every upstream call in milliseconds (default: 5000)
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,

    /// Search hits requested when the caller does not specify k
    #[serde(default = "default_search_k")]
    pub default_search_k: usize,

    /// How many top aspects the overview reports (default: 3)
    #[serde(default = "default_top_aspects")]
    pub top_aspects: usize,

    /// Observation window size in reviews; oldest evicted first
    #[serde(default = "default_journal_capacity")]
    pub journal_capacity: usize,
}

fn default_call_timeout_ms() -> u64 {
    5_000
}

fn default_search_k() -> usize {
    5
}

fn default_top_aspects() -> usize {
    3
}

fn default_journal_capacity() -> usize {
    200
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: GatewayConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream_base_url.is_empty() {
            return Err(ConfigError::InvalidField("upstream_base_url".to_string()));
        }
        if self.journal_capacity == 0 {
            return Err(ConfigError::InvalidField("journal_capacity".to_string()));
        }
        self.pipeline()
            .validate()
            .map_err(ConfigError::InvalidField)
    }

    /// The orchestration settings carried by this configuration
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            call_timeout_ms: self.call_timeout_ms,
            default_search_k: self.default_search_k,
        }
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        GatewayConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8090,
            upstream_base_url: "http://localhost:8080".to_string(),
            call_timeout_ms: default_call_timeout_ms(),
            default_search_k: default_search_k(),
            top_aspects: default_top_aspects(),
            journal_capacity: default_journal_capacity(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
