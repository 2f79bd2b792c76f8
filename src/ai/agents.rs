//! High-level summary and revision agents.

use std::sync::Arc;

use crate::repos::RepositoryInfo;

use super::context::{revision_user_prompt, summary_user_prompt};
use super::error::SummaryError;
use super::fallback::ModelChain;
use super::output::{RepositorySummary, SummaryOutput};
use super::prompts::{REVISION_INSTRUCTIONS, SUMMARY_INSTRUCTIONS};
use super::provider::{ChatCompletionProvider, ChatRequest};

/// Generates the initial summary for a freshly fetched repository.
#[derive(Clone)]
pub struct SummaryAgent {
    provider: Arc<dyn ChatCompletionProvider>,
    chain: ModelChain,
}

impl SummaryAgent {
    /// Builds an agent over `provider` with the configured fallback chain.
    #[must_use]
    pub fn new(provider: Arc<dyn ChatCompletionProvider>, chain: ModelChain) -> Self {
        Self { provider, chain }
    }

    /// Summarises `repository`, running the model chain until one model
    /// yields a valid output.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] when every model fails or a model answers
    /// with an invalid payload.
    pub async fn summarize(
        &self,
        repository: &RepositoryInfo,
    ) -> Result<SummaryOutput, SummaryError> {
        tracing::info!(
            repository = %repository.full_name(),
            models = ?self.chain.models(),
            "generating repository summary"
        );
        let request = ChatRequest {
            system: SUMMARY_INSTRUCTIONS.to_owned(),
            user: summary_user_prompt(repository),
            schema_name: "summary_output",
        };
        self.chain.run(self.provider.as_ref(), &request).await
    }
}

/// Applies operator edit requests to an existing summary.
#[derive(Clone)]
pub struct RevisionAgent {
    provider: Arc<dyn ChatCompletionProvider>,
    chain: ModelChain,
}

impl RevisionAgent {
    /// Builds an agent over `provider` with the configured fallback chain.
    #[must_use]
    pub fn new(provider: Arc<dyn ChatCompletionProvider>, chain: ModelChain) -> Self {
        Self { provider, chain }
    }

    /// Revises `current` per the operator's `instructions`.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] when every model fails or a model answers
    /// with an invalid payload.
    pub async fn revise(
        &self,
        repository: &RepositoryInfo,
        current: &RepositorySummary,
        instructions: &str,
    ) -> Result<SummaryOutput, SummaryError> {
        tracing::info!(
            repository = %repository.full_name(),
            "revising repository summary"
        );
        let request = ChatRequest {
            system: REVISION_INSTRUCTIONS.to_owned(),
            user: revision_user_prompt(repository, current, instructions),
            schema_name: "summary_output",
        };
        self.chain.run(self.provider.as_ref(), &request).await
    }
}
