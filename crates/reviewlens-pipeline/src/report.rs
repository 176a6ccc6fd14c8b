//! Canonical record shapes produced by normalization and orchestration

use reviewlens_domain::{AspectObservation, Polarity, SearchHit, TokenAttribution};
use serde::Serialize;

/// Canonical shape of a predict payload
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Overall sentiment band for the whole text
    pub sentiment: Polarity,
    /// Overall signed sentiment score in [-1, 1]
    pub score: f64,
    /// Per-aspect observations, possibly empty
    pub aspects: Vec<AspectObservation>,
}

/// Canonical shape of an explain payload
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// Token attributions in original token order
    pub tokens: Vec<TokenAttribution>,
    /// Some deployments also return aspects here; empty otherwise
    pub aspects: Vec<AspectObservation>,
}

/// Canonical shape of a search payload
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultSet {
    /// Retrieval hits in upstream order
    pub hits: Vec<SearchHit>,
}

/// Merged output of the explain operation: the primary prediction plus
/// whatever the secondary attribution endpoint produced.
///
/// `degraded` names the secondary endpoints whose contribution was
/// replaced with an empty value; the consumer renders those sections as
/// "no data yet" rather than an error.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport {
    /// Overall sentiment band
    pub sentiment: Polarity,
    /// Overall signed sentiment score
    pub score: f64,
    /// Per-aspect observations
    pub aspects: Vec<AspectObservation>,
    /// Token attributions; empty when the secondary degraded
    pub tokens: Vec<TokenAttribution>,
    /// Identifiers of degraded secondary endpoints
    pub degraded: Vec<String>,
}

/// Output of the search operation after dedup
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// Deduplicated hits, first occurrences in upstream order
    pub hits: Vec<SearchHit>,
    /// Identifiers of degraded secondary endpoints
    pub degraded: Vec<String>,
}
