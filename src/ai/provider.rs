//! Model provider abstraction used by the fallback chain.

use async_trait::async_trait;
use thiserror::Error;

/// A single chat-completion request, already rendered to prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// System instruction set.
    pub system: String,
    /// User turn: repository context plus the task statement.
    pub user: String,
    /// Name reported with the structured-output schema.
    pub schema_name: &'static str,
}

/// Errors a provider can report for one model invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Transient upstream failure: rate limit, 5xx, timeout, or transport.
    ///
    /// The fallback chain advances to the next model on this variant only.
    #[error("transient provider failure: {message}")]
    Transient {
        /// Failure detail.
        message: String,
    },

    /// Non-retryable request failure, e.g. a rejected API key.
    #[error("provider request failed: {message}")]
    Request {
        /// Failure detail.
        message: String,
    },
}

impl ProviderError {
    /// Whether the fallback chain may advance past this failure.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Provider capable of running a chat completion against a named model.
///
/// Implementations perform no retries and no memoization; ordering and
/// fallback policy live entirely in the chain controller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    /// Runs one completion against `model` and returns the assistant text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transient`] for failures worth trying on
    /// another model and [`ProviderError::Request`] for everything else.
    async fn complete(&self, model: &str, request: &ChatRequest) -> Result<String, ProviderError>;
}
