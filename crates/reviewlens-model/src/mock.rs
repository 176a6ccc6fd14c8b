//! Deterministic mock backend for orchestration tests
//!
//! Mirrors the real backend's surface without any network: canned JSON
//! payloads per endpoint, per-endpoint failure injection, optional
//! artificial delay (for timeout tests under a paused tokio clock), and
//! call counts so tests can assert which endpoints were actually hit.

use crate::{BackendError, ModelBackend};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Which mock endpoint a configuration call refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Predict,
    Explain,
    Search,
}

#[derive(Debug)]
struct EndpointState {
    response: Value,
    fail: bool,
    delay: Option<Duration>,
    calls: usize,
}

impl EndpointState {
    fn new(response: Value) -> Self {
        Self {
            response,
            fail: false,
            delay: None,
            calls: 0,
        }
    }
}

#[derive(Debug)]
struct Inner {
    predict: EndpointState,
    explain: EndpointState,
    search: EndpointState,
}

/// Mock model backend for deterministic testing.
///
/// Clones share state through an `Arc`, so a test can keep a handle for
/// assertions while the orchestrator owns another.
///
/// # Examples
///
/// ```
/// use reviewlens_model::{MockBackend, ModelBackend};
/// use serde_json::json;
///
/// # async fn demo() {
/// let mock = MockBackend::new();
/// mock.set_predict(json!({"sentiment": "positive", "score": 0.9, "aspects": []}));
///
/// let payload = mock.predict("great phone").await.unwrap();
/// assert_eq!(payload["sentiment"], "positive");
/// assert_eq!(mock.predict_calls(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    /// Create a mock whose endpoints return minimal valid payloads
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                predict: EndpointState::new(json!({
                    "sentiment": "neutral",
                    "score": 0.0,
                    "aspects": [],
                })),
                explain: EndpointState::new(json!({ "tokens": [] })),
                search: EndpointState::new(json!({ "hits": [] })),
            })),
        }
    }

    fn with_endpoint<R>(&self, endpoint: Endpoint, f: impl FnOnce(&mut EndpointState) -> R) -> R {
        let mut inner = self.inner.lock().unwrap();
        let state = match endpoint {
            Endpoint::Predict => &mut inner.predict,
            Endpoint::Explain => &mut inner.explain,
            Endpoint::Search => &mut inner.search,
        };
        f(state)
    }

    /// Set the canned predict payload
    pub fn set_predict(&self, response: Value) {
        self.with_endpoint(Endpoint::Predict, |s| s.response = response);
    }

    /// Set the canned explain payload
    pub fn set_explain(&self, response: Value) {
        self.with_endpoint(Endpoint::Explain, |s| s.response = response);
    }

    /// Set the canned search payload
    pub fn set_search(&self, response: Value) {
        self.with_endpoint(Endpoint::Search, |s| s.response = response);
    }

    /// Make predict calls fail with a communication error
    pub fn fail_predict(&self) {
        self.with_endpoint(Endpoint::Predict, |s| s.fail = true);
    }

    /// Make explain calls fail with a communication error
    pub fn fail_explain(&self) {
        self.with_endpoint(Endpoint::Explain, |s| s.fail = true);
    }

    /// Make search calls fail with a communication error
    pub fn fail_search(&self) {
        self.with_endpoint(Endpoint::Search, |s| s.fail = true);
    }

    /// Delay explain responses, e.g. past the orchestrator's timeout
    pub fn delay_explain(&self, delay: Duration) {
        self.with_endpoint(Endpoint::Explain, |s| s.delay = Some(delay));
    }

    /// Delay predict responses
    pub fn delay_predict(&self, delay: Duration) {
        self.with_endpoint(Endpoint::Predict, |s| s.delay = Some(delay));
    }

    /// Number of predict calls made so far
    pub fn predict_calls(&self) -> usize {
        self.with_endpoint(Endpoint::Predict, |s| s.calls)
    }

    /// Number of explain calls made so far
    pub fn explain_calls(&self) -> usize {
        self.with_endpoint(Endpoint::Explain, |s| s.calls)
    }

    /// Number of search calls made so far
    pub fn search_calls(&self) -> usize {
        self.with_endpoint(Endpoint::Search, |s| s.calls)
    }

    async fn respond(&self, endpoint: Endpoint) -> Result<Value, BackendError> {
        let (response, fail, delay) = self.with_endpoint(endpoint, |s| {
            s.calls += 1;
            (s.response.clone(), s.fail, s.delay)
        });

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if fail {
            return Err(BackendError::Communication(
                "mock endpoint failure".to_string(),
            ));
        }
        Ok(response)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBackend for MockBackend {
    async fn predict(&self, _text: &str) -> Result<Value, BackendError> {
        self.respond(Endpoint::Predict).await
    }

    async fn explain(&self, _text: &str) -> Result<Value, BackendError> {
        self.respond(Endpoint::Explain).await
    }

    async fn search(&self, _query: &str, _k: usize) -> Result<Value, BackendError> {
        self.respond(Endpoint::Search).await
    }
}
