//! HTTP implementation of the model-service backend
//!
//! Talks to the model service's JSON API:
//!
//! - `POST /model/predict` with `{ "text": ... }`
//! - `POST /explain` with `{ "text": ... }`
//! - `POST /search` with `{ "query": ..., "k": ... }`
//!
//! Payloads are returned as raw `serde_json::Value`; shape validation
//! belongs to the pipeline's normalizer.

use crate::{BackendError, ModelBackend};
use serde::Serialize;
use serde_json::Value;

/// Default model-service endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Request body for the predict and explain endpoints
#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

/// Request body for the search endpoint
#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    k: usize,
}

/// HTTP client for the model service
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend for the given base URL (e.g. "http://backend:8080").
    /// A trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Create a backend for the default local endpoint
    pub fn default_endpoint() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, BackendError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Communication(format!("{path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::InvalidBody(format!("{path}: {e}")))
    }
}

impl ModelBackend for HttpBackend {
    async fn predict(&self, text: &str) -> Result<Value, BackendError> {
        self.post_json("/model/predict", &TextRequest { text }).await
    }

    async fn explain(&self, text: &str) -> Result<Value, BackendError> {
        self.post_json("/explain", &TextRequest { text }).await
    }

    async fn search(&self, query: &str, k: usize) -> Result<Value, BackendError> {
        self.post_json("/search", &SearchRequest { query, k }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let backend = HttpBackend::new("http://backend:8080/");
        assert_eq!(backend.base_url, "http://backend:8080");
    }

    #[test]
    fn test_default_endpoint() {
        let backend = HttpBackend::default_endpoint();
        assert_eq!(backend.base_url, DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        // reserved port, nothing listening
        let backend = HttpBackend::new("http://127.0.0.1:9");
        let result = backend.predict("test").await;
        match result {
            Err(BackendError::Communication(_)) => {}
            other => panic!("Expected Communication error, got {other:?}"),
        }
    }
}
