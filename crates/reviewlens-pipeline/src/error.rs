//! Error taxonomy for the aggregation layer
//!
//! Only two conditions ever reach the caller as errors: blank input and
//! a failed primary endpoint. Everything else degrades to an empty or
//! default value so the consumer always has something to render.

use thiserror::Error;

/// An upstream payload did not match the expected canonical shape.
///
/// Raised for structural violations only (a composite value where a
/// scalar belongs, a scalar where a sequence belongs). Merely missing
/// optional fields fall back to documented defaults instead, and unknown
/// extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shape mismatch at `{field}`: {reason}")]
pub struct ShapeMismatch {
    /// Path of the offending field
    pub field: String,
    /// What was wrong with it
    pub reason: String,
}

impl ShapeMismatch {
    pub(crate) fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced to the caller of an orchestrated operation
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input text was blank after trimming; rejected before any upstream
    /// call, so no network cost is incurred
    #[error("Empty input: text is blank")]
    EmptyInput,

    /// The primary endpoint failed, timed out, or returned a malformed
    /// body; nothing downstream is meaningful without it
    #[error("Primary endpoint unavailable: {0}")]
    PrimaryUnavailable(String),
}
