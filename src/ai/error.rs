//! Error types exposed by the summarization layer.

use thiserror::Error;

/// Errors surfaced while generating or revising a repository summary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SummaryError {
    /// A model responded, but the payload could not be coerced into the
    /// declared summary schema.
    ///
    /// Validation failures are never retried on weaker models: they indicate
    /// a structurally bad response, not model unavailability.
    #[error("model '{model}' returned an invalid summary payload: {reason}")]
    InvalidOutput {
        /// Model that produced the malformed response.
        model: String,
        /// Why the payload failed validation.
        reason: String,
    },

    /// The fallback chain was exhausted without a usable response.
    #[error("summary generation failed; attempted models {attempted:?}: {last_error}")]
    Exhausted {
        /// Models attempted, in chain order.
        attempted: Vec<String>,
        /// The error observed on the final attempt.
        last_error: String,
    },
}
