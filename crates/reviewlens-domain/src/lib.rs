//! Reviewlens Domain Layer
//!
//! Core value objects and aggregation logic for the review-intelligence
//! pipeline. Everything in this crate is a pure function over its inputs:
//! no I/O, no shared mutable state, so concurrent requests can fold the
//! same data without coordination.
//!
//! ## Key Concepts
//!
//! - **AspectObservation**: one per-review aspect/sentiment data point
//! - **Polarity**: categorical sentiment direction derived from a score
//!   via fixed thresholds
//! - **AspectAggregator**: running sum/count fold of observations into
//!   per-aspect statistics and a per-day trend
//! - **SearchHit** deduplication: stable, first-occurrence-wins
//! - **MetricsOverview**: the dashboard read-model snapshot
//!
//! ## Architecture
//!
//! Infrastructure (upstream HTTP calls, normalization of raw payloads,
//! the HTTP surface) lives in other crates. This crate only consumes
//! already-canonical values and produces new values.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod attribution;
pub mod metrics;
pub mod observation;
pub mod search;

// Re-exports for convenience
pub use aggregate::{AspectAggregate, AspectAggregator};
pub use attribution::TokenAttribution;
pub use metrics::{build_overview, MetricsOverview, TrendPoint};
pub use observation::{AspectObservation, Polarity};
pub use search::{dedupe, SearchHit};
