//! Reviewlens Model-Service Access Layer
//!
//! Pluggable clients for the external sentiment/ABSA model service.
//!
//! # Architecture
//!
//! This crate defines the [`ModelBackend`] trait that the pipeline layer
//! orchestrates over, plus two implementations:
//!
//! - [`HttpBackend`]: talks to the real model service over HTTP
//! - [`MockBackend`]: deterministic mock with per-endpoint call counts,
//!   canned payloads, failure injection and artificial delay, for testing
//!   orchestration behavior without a network
//!
//! Backends return raw `serde_json::Value` payloads on purpose: upstream
//! response shapes vary between deployments, and shaping them into
//! canonical records is the normalizer's job, not the transport's.

#![warn(missing_docs)]

pub mod http;
pub mod mock;

use serde_json::Value;
use std::future::Future;
use thiserror::Error;

pub use http::HttpBackend;
pub use mock::MockBackend;

/// Errors that can occur while calling the model service
#[derive(Error, Debug)]
pub enum BackendError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Upstream answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Response body was not valid JSON
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

/// Access to the external model service.
///
/// Every method resolves to the raw JSON payload of one upstream endpoint.
/// Implementations do not enforce a deadline themselves; the orchestrator
/// bounds each call with a single configurable timeout.
pub trait ModelBackend: Send + Sync {
    /// Overall sentiment plus per-aspect breakdown for one review text
    fn predict(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// Token-level attributions (and optionally aspects) for one text
    fn explain(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// Top-k semantic search over the review corpus
    fn search(
        &self,
        query: &str,
        k: usize,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;
}
