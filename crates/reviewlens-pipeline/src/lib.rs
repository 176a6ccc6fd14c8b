//! Reviewlens Aggregation and Fallback-Orchestration Layer
//!
//! The one layer with real invariants: it calls the model service's
//! primary and secondary endpoints, tolerates partial failure of the
//! secondaries, normalizes heterogeneous response shapes into canonical
//! records, and merges everything into one report per operation.
//!
//! # Pieces
//!
//! - [`normalize`]: pure payload-to-canonical-shape conversion with
//!   documented defaults and explicit coercion rules
//! - [`Orchestrator`]: primary-first call coordination; primary failure
//!   is fatal, secondary failure degrades to empty plus a warning
//! - [`PipelineError`]: the only two errors a caller ever sees
//!   (`EmptyInput`, `PrimaryUnavailable`)
//!
//! Everything here is a pure function over its inputs apart from the
//! upstream calls themselves, so concurrent requests share nothing.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod report;

pub use config::PipelineConfig;
pub use error::{PipelineError, ShapeMismatch};
pub use orchestrator::Orchestrator;
pub use report::{ExplainReport, Explanation, Prediction, SearchReport, SearchResultSet};
