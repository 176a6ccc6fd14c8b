//! Token-level attribution scores

use serde::{Deserialize, Serialize};

/// Per-token contribution to the overall prediction.
///
/// Sign indicates direction (negative pulls sentiment down), magnitude
/// indicates strength. Sequences of attributions preserve original token
/// position and are never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAttribution {
    /// The token as it appeared in the text
    pub token: String,
    /// Contribution score in [-1, 1]
    pub score: f64,
}
