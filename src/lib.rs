//! Droidpress library crate: turns a repository URL into a channel-ready
//! Android project announcement.
//!
//! The pipeline fetches repository metadata from GitHub or GitLab,
//! summarises it through an ordered chain of AI models, renders an HTML
//! caption and banner, and holds the result in an in-process preview
//! registry until the operator revises, publishes, or abandons it.

pub mod ai;
pub mod config;
pub mod preview;
pub mod repos;
mod text;
pub mod workflow;

pub use ai::{
    ModelChain, OpenAiConfig, OpenAiProvider, RevisionAgent, SummaryAgent, SummaryError,
    SummaryOutput,
};
pub use config::{ConfigError, DroidpressConfig};
pub use preview::{PreviewDraft, PreviewEntry, PreviewError, PreviewRegistry};
pub use repos::{
    FetchError, GitHubFetcher, GitLabFetcher, RepositoryFetcher, RepositoryInfo,
    RepositoryLocator, RepositoryPlatform,
};
pub use workflow::{
    CommandOutcome, ConversationState, PipelineDeps, PostWorkflow, PublishOutcome, ReviseOutcome,
    render_post_caption,
};
