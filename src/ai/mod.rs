//! AI summarization over an OpenAI-compatible chat-completions API.
//!
//! A [`ModelChain`] tries configured models in order, advancing only on
//! transient provider failures, under one shared deadline. Successful
//! responses are validated against the [`SummaryOutput`] schema; the
//! [`SummaryAgent`] and [`RevisionAgent`] wrap the chain with the prompt
//! assembly for the initial pass and operator-driven edits respectively.

mod agents;
mod context;
mod error;
mod fallback;
mod openai;
mod output;
mod prompts;
mod provider;

pub use agents::{RevisionAgent, SummaryAgent};
pub use error::SummaryError;
pub use fallback::ModelChain;
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use output::{
    ImportantLink, ProjectTag, RejectedRepository, RejectionReason, RepositorySummary,
    SummaryOutput, parse_summary_output, summary_output_schema,
};
pub use provider::{ChatCompletionProvider, ChatRequest, ProviderError};

#[cfg(test)]
pub use provider::MockChatCompletionProvider;
