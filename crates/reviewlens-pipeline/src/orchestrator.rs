//! Primary/secondary call coordination
//!
//! The primary endpoint is load-bearing: if it fails, times out, or
//! returns a malformed body, the whole operation fails with
//! `PrimaryUnavailable` and no secondary call is attempted. Once the
//! primary has succeeded, each secondary is best-effort: any failure
//! degrades that secondary's contribution to empty, is logged as a
//! warning, and lands in the report's `degraded` list for observability.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::normalize::{normalize_explanation, normalize_prediction, normalize_search};
use crate::report::{ExplainReport, SearchReport};
use reviewlens_model::{BackendError, ModelBackend};
use reviewlens_domain::dedupe;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Identifier of the token-attribution secondary in `degraded` lists
pub const SECONDARY_EXPLAIN: &str = "explain";

/// Coordinates upstream calls and merges their normalized outputs
pub struct Orchestrator<B: ModelBackend> {
    backend: Arc<B>,
    config: PipelineConfig,
}

impl<B: ModelBackend> Orchestrator<B> {
    /// Create an orchestrator over the given backend
    pub fn new(backend: B, config: PipelineConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    /// Bound one upstream call by the configured deadline. A timeout is
    /// indistinguishable from a non-2xx response to everything downstream.
    async fn bounded<F>(&self, call: F) -> Result<Value, String>
    where
        F: Future<Output = Result<Value, BackendError>>,
    {
        match timeout(self.config.call_timeout(), call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {}ms", self.config.call_timeout_ms)),
        }
    }

    /// Run one secondary call; `None` means it degraded. Secondaries are
    /// independent: a failure here never affects the operation or any
    /// other secondary.
    async fn secondary<F>(&self, name: &str, call: F) -> Option<Value>
    where
        F: Future<Output = Result<Value, BackendError>>,
    {
        match self.bounded(call).await {
            Ok(value) => Some(value),
            Err(cause) => {
                warn!(endpoint = name, %cause, "secondary endpoint degraded");
                None
            }
        }
    }

    /// Sentiment, aspects and token attributions for one review text.
    ///
    /// Primary: predict. Secondary: explain (token attributions). Blank
    /// input is rejected before any upstream call.
    pub async fn explain(&self, text: &str) -> Result<ExplainReport, PipelineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let raw = self
            .bounded(self.backend.predict(text))
            .await
            .map_err(PipelineError::PrimaryUnavailable)?;
        let prediction = normalize_prediction(&raw)
            .map_err(|e| PipelineError::PrimaryUnavailable(format!("malformed predict body: {e}")))?;

        debug!(
            aspects = prediction.aspects.len(),
            score = prediction.score,
            "primary prediction normalized"
        );

        let mut degraded = Vec::new();
        let mut aspects = prediction.aspects;
        let tokens = match self.secondary(SECONDARY_EXPLAIN, self.backend.explain(text)).await {
            Some(raw) => match normalize_explanation(&raw) {
                Ok(explanation) => {
                    // some deployments only emit aspects on this endpoint
                    if aspects.is_empty() {
                        aspects = explanation.aspects;
                    }
                    explanation.tokens
                }
                Err(e) => {
                    warn!(endpoint = SECONDARY_EXPLAIN, error = %e, "secondary body degraded");
                    degraded.push(SECONDARY_EXPLAIN.to_string());
                    Vec::new()
                }
            },
            None => {
                degraded.push(SECONDARY_EXPLAIN.to_string());
                Vec::new()
            }
        };

        info!(
            aspects = aspects.len(),
            tokens = tokens.len(),
            degraded = degraded.len(),
            "explain operation complete"
        );

        Ok(ExplainReport {
            sentiment: prediction.sentiment,
            score: prediction.score,
            aspects,
            tokens,
            degraded,
        })
    }

    /// Top-k semantic search, deduplicated by normalized text.
    pub async fn search(
        &self,
        query: &str,
        k: Option<usize>,
    ) -> Result<SearchReport, PipelineError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let k = k.unwrap_or(self.config.default_search_k);

        let raw = self
            .bounded(self.backend.search(query, k))
            .await
            .map_err(PipelineError::PrimaryUnavailable)?;
        let set = normalize_search(&raw)
            .map_err(|e| PipelineError::PrimaryUnavailable(format!("malformed search body: {e}")))?;

        let before = set.hits.len();
        let hits = dedupe(set.hits);
        if hits.len() < before {
            debug!(dropped = before - hits.len(), "duplicate search hits removed");
        }

        Ok(SearchReport {
            hits,
            degraded: Vec::new(),
        })
    }
}
