//! Ordered model fallback controller.

use std::time::Duration;

use tokio::time::Instant;

use super::error::SummaryError;
use super::output::{SummaryOutput, parse_summary_output};
use super::provider::{ChatCompletionProvider, ChatRequest};

/// Ordered sequence of model identifiers with a shared deadline.
///
/// The chain advances to the next model only on transient provider failures.
/// A response that fails structural validation fails the call immediately:
/// it indicates a structurally bad response, not model unavailability. The
/// deadline bounds the whole chain, not each model, so worst-case operator
/// wait stays fixed even across fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChain {
    models: Vec<String>,
    deadline: Duration,
}

impl ModelChain {
    /// Builds a chain from model identifiers ordered strongest first.
    #[must_use]
    pub const fn new(models: Vec<String>, deadline: Duration) -> Self {
        Self { models, deadline }
    }

    /// Model identifiers in attempt order.
    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Runs `request` through the chain until a model yields a structurally
    /// valid [`SummaryOutput`].
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::InvalidOutput`] when a model responds with a
    /// payload that cannot be coerced into the schema, and
    /// [`SummaryError::Exhausted`] when every attempted model failed
    /// transiently, a non-transient provider error occurred, or the chain
    /// deadline expired.
    pub async fn run(
        &self,
        provider: &dyn ChatCompletionProvider,
        request: &ChatRequest,
    ) -> Result<SummaryOutput, SummaryError> {
        let started = Instant::now();
        let mut attempted: Vec<String> = Vec::new();
        let mut last_error = "no models configured".to_owned();

        for model in &self.models {
            let Some(remaining) = self.deadline.checked_sub(started.elapsed()) else {
                last_error = format!("chain deadline of {:?} exceeded", self.deadline);
                break;
            };

            attempted.push(model.clone());
            tracing::debug!(model, "attempting summary model");

            match tokio::time::timeout(remaining, provider.complete(model, request)).await {
                Err(_elapsed) => {
                    last_error = format!("chain deadline of {:?} exceeded", self.deadline);
                    break;
                }
                Ok(Err(error)) if error.is_transient() => {
                    tracing::warn!(model, error = %error, "model failed transiently, advancing");
                    last_error = error.to_string();
                }
                Ok(Err(error)) => {
                    return Err(SummaryError::Exhausted {
                        attempted,
                        last_error: error.to_string(),
                    });
                }
                Ok(Ok(content)) => {
                    return parse_summary_output(&content).map_err(|reason| {
                        SummaryError::InvalidOutput {
                            model: model.clone(),
                            reason,
                        }
                    });
                }
            }
        }

        Err(SummaryError::Exhausted {
            attempted,
            last_error,
        })
    }
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
