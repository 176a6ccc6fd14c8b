//! HTTP request handlers for the Gateway.
//!
//! Thin axum layer over the orchestrator and the observation journal;
//! all aggregation logic lives in the domain and pipeline crates.

use crate::journal::ObservationLog;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use reviewlens_domain::{build_overview, MetricsOverview};
use reviewlens_model::ModelBackend;
use reviewlens_pipeline::{ExplainReport, Orchestrator, PipelineError, SearchReport};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Shared application state
pub struct AppState<B: ModelBackend> {
    /// Upstream call coordination
    pub orchestrator: Arc<Orchestrator<B>>,
    /// Rolling observation window feeding the EDA and metrics views
    pub journal: Arc<Mutex<ObservationLog>>,
    /// How many top aspects the overview reports
    pub top_aspects: usize,
}

impl<B: ModelBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            journal: Arc::clone(&self.journal),
            top_aspects: self.top_aspects,
        }
    }
}

/// Explain request body
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    /// Review text to analyze
    pub text: String,
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Query text
    pub query: String,
    /// Number of hits to request; server default when absent
    #[serde(default)]
    pub k: Option<usize>,
}

/// One row of the EDA aspects view
#[derive(Debug, Serialize)]
pub struct EdaRow {
    /// Aspect name, case-preserved
    pub aspect: String,
    /// Observation count
    pub mentions: u64,
    /// Mean sentiment for this aspect
    pub avg_sentiment: f64,
    /// Banded label; the middle band reads "mixed" in this view
    pub label: &'static str,
}

/// EDA aspects response
#[derive(Debug, Serialize)]
pub struct EdaResponse {
    /// Rows sorted most problematic (most negative average) first
    pub aspects: Vec<EdaRow>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Reviews currently in the observation window
    pub reviews_observed: u64,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// User-visible error message
    pub error: String,
    /// Diagnostic detail, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Rejected before any upstream call
    BadRequest(String),
    /// The primary upstream endpoint failed; nothing to render
    UpstreamUnavailable(String),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::EmptyInput => ApiError::BadRequest(e.to_string()),
            PipelineError::PrimaryUnavailable(detail) => ApiError::UpstreamUnavailable(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: message,
                    detail: None,
                },
            ),
            ApiError::UpstreamUnavailable(detail) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: "model service unavailable, please retry".to_string(),
                    detail: Some(detail),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// POST /explain - sentiment, aspects and token attributions for one text
async fn explain_review<B: ModelBackend + 'static>(
    State(state): State<AppState<B>>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainReport>, ApiError> {
    let report = state.orchestrator.explain(&request.text).await?;

    // feed the rolling analytics window; ingestion day buckets the trend
    let today = Utc::now().date_naive();
    state
        .journal
        .lock()
        .unwrap()
        .record(today, report.aspects.clone());

    Ok(Json(report))
}

/// POST /search - deduplicated semantic search over the review corpus
async fn search_reviews<B: ModelBackend + 'static>(
    State(state): State<AppState<B>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchReport>, ApiError> {
    let report = state.orchestrator.search(&request.query, request.k).await?;
    Ok(Json(report))
}

/// GET /eda/aspects - rolling aspect aggregates, most problematic first
async fn eda_aspects<B: ModelBackend + 'static>(
    State(state): State<AppState<B>>,
) -> Json<EdaResponse> {
    let aggregator = state.journal.lock().unwrap().fold();

    let mut rows: Vec<EdaRow> = aggregator
        .aggregates()
        .into_iter()
        .map(|agg| EdaRow {
            label: agg.polarity().trend_label(),
            aspect: agg.aspect,
            mentions: agg.mentions,
            avg_sentiment: agg.avg_sentiment,
        })
        .collect();
    rows.sort_by(|a, b| a.avg_sentiment.total_cmp(&b.avg_sentiment));

    Json(EdaResponse { aspects: rows })
}

/// GET /metrics-overview - dashboard snapshot of the observation window
async fn metrics_overview<B: ModelBackend + 'static>(
    State(state): State<AppState<B>>,
) -> Json<MetricsOverview> {
    let (aggregator, total_reviews, scores) = {
        let journal = state.journal.lock().unwrap();
        (journal.fold(), journal.total_reviews(), journal.scores())
    };

    Json(build_overview(
        &aggregator,
        total_reviews,
        &scores,
        state.top_aspects,
    ))
}

/// GET /health - liveness plus window size
async fn health_check<B: ModelBackend + 'static>(
    State(state): State<AppState<B>>,
) -> Json<HealthResponse> {
    let reviews_observed = state.journal.lock().unwrap().total_reviews();
    Json(HealthResponse {
        status: "ok".to_string(),
        reviews_observed,
    })
}

/// Create the axum router with all routes
pub fn create_router<B: ModelBackend + 'static>(state: AppState<B>) -> Router {
    Router::new()
        .route("/explain", post(explain_review::<B>))
        .route("/search", post(search_reviews::<B>))
        .route("/eda/aspects", get(eda_aspects::<B>))
        .route("/metrics-overview", get(metrics_overview::<B>))
        .route("/health", get(health_check::<B>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::NaiveDate;
    use reviewlens_domain::AspectObservation;
    use reviewlens_model::MockBackend;
    use reviewlens_pipeline::PipelineConfig;
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> (AppState<MockBackend>, MockBackend) {
        let mock = MockBackend::new();
        let state = AppState {
            orchestrator: Arc::new(Orchestrator::new(mock.clone(), PipelineConfig::default())),
            journal: Arc::new(Mutex::new(ObservationLog::new(200))),
            top_aspects: 3,
        };
        (state, mock)
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, _) = create_test_state();
        let app = create_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["reviews_observed"], 0);
    }

    #[tokio::test]
    async fn test_explain_feeds_the_journal() {
        let (state, mock) = create_test_state();
        mock.set_predict(json!({
            "sentiment": "negative",
            "score": 0.8,
            "aspects": [{ "aspect": "battery", "sentiment": "negative", "score": -0.8 }]
        }));
        let journal = Arc::clone(&state.journal);
        let app = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/explain")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "battery dies fast"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["aspects"][0]["aspect"], "battery");
        assert_eq!(journal.lock().unwrap().total_reviews(), 1);
    }

    #[tokio::test]
    async fn test_blank_text_rejected_before_upstream() {
        let (state, mock) = create_test_state();
        let journal = Arc::clone(&state.journal);
        let app = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/explain")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "   "}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.predict_calls(), 0);
        assert_eq!(journal.lock().unwrap().total_reviews(), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_maps_to_bad_gateway() {
        let (state, mock) = create_test_state();
        mock.fail_predict();
        let app = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/explain")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "battery dies fast"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_search_returns_deduped_hits() {
        let (state, mock) = create_test_state();
        mock.set_search(json!({ "hits": [
            { "text": "A", "score": 0.9 },
            { "text": "A", "score": 0.5 },
            { "text": "B", "score": 0.7 }
        ] }));
        let app = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/search")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query": "battery"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let hits = json["hits"].as_array().unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0]["score"], 0.9);
    }

    #[tokio::test]
    async fn test_eda_aspects_sorted_most_negative_first() {
        let (state, _) = create_test_state();
        {
            let mut journal = state.journal.lock().unwrap();
            journal.record(
                day("2025-10-25"),
                vec![
                    AspectObservation::from_score("camera", 0.9, 0.9),
                    AspectObservation::from_score("battery", -0.8, 0.9),
                    AspectObservation::from_score("screen", 0.1, 0.9),
                ],
            );
        }
        let app = create_router(state);

        let request = Request::builder()
            .uri("/eda/aspects")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let rows = json["aspects"].as_array().unwrap();
        assert_eq!(rows[0]["aspect"], "battery");
        assert_eq!(rows[0]["label"], "negative");
        assert_eq!(rows[1]["aspect"], "screen");
        // the middle band reads "mixed" in this view
        assert_eq!(rows[1]["label"], "mixed");
        assert_eq!(rows[2]["aspect"], "camera");
    }

    #[tokio::test]
    async fn test_metrics_overview_from_empty_window() {
        let (state, _) = create_test_state();
        let app = create_router(state);

        let request = Request::builder()
            .uri("/metrics-overview")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["total_reviews"], 0);
        assert_eq!(json["pct_negative"], 0.0);
        assert_eq!(json["top_aspects"].as_array().unwrap().len(), 0);
        assert_eq!(json["trend"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_metrics_overview_reports_window() {
        let (state, _) = create_test_state();
        {
            let mut journal = state.journal.lock().unwrap();
            journal.record(
                day("2025-10-25"),
                vec![
                    AspectObservation::from_score("battery", -0.8, 0.9),
                    AspectObservation::from_score("battery", -0.6, 0.9),
                ],
            );
            journal.record(
                day("2025-10-26"),
                vec![AspectObservation::from_score("camera", 0.9, 0.9)],
            );
        }
        let app = create_router(state);

        let request = Request::builder()
            .uri("/metrics-overview")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["total_reviews"], 2);
        assert_eq!(json["top_aspects"][0], "battery");
        assert_eq!(json["trend"][0]["day"], "2025-10-25");
        assert_eq!(json["trend"][1]["day"], "2025-10-26");
    }
}
