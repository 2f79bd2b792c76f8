//! Post creation workflow.
//!
//! [`PostWorkflow`] drives one operator conversation through the pipeline:
//! fetch the repository, summarise it, hold a preview for review, apply
//! revisions, and finally publish or cancel. Every method returns an outcome
//! enum rather than an error: fetch and summarization failures are expected
//! operator-facing events, and none of them may poison the conversation.

mod caption;
mod ports;

use std::sync::Arc;

use uuid::Uuid;

use crate::ai::{
    RejectedRepository, RepositorySummary, RevisionAgent, SummaryAgent, SummaryOutput,
};
use crate::preview::{PreviewDraft, PreviewEntry, PreviewRegistry};
use crate::repos::{RepositoryFetcher, RepositoryInfo, RepositoryLocator, RepositoryPlatform};

pub use caption::{CaptionError, render_post_caption};
pub use ports::{BannerError, BannerRenderer, ChannelPublisher, MessageRef, PublishError};

#[cfg(test)]
pub use ports::{MockBannerRenderer, MockChannelPublisher};

/// Where a conversation currently stands in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// No work in flight.
    Idle,
    /// A repository fetch is running.
    Fetching,
    /// The summary chain is running.
    Summarizing,
    /// A preview is stored and awaiting operator review.
    PreviewReady {
        /// Identifier of the stored preview.
        preview_id: Uuid,
    },
    /// A revision of the current preview is running.
    Revising {
        /// Identifier of the preview being revised.
        preview_id: Uuid,
    },
    /// The current preview is being published.
    Publishing {
        /// Identifier of the preview being published.
        preview_id: Uuid,
    },
    /// The post went out; the conversation is finished.
    Published,
}

impl ConversationState {
    /// Identifier of the preview this state refers to, if any.
    #[must_use]
    pub const fn preview_id(self) -> Option<Uuid> {
        match self {
            Self::PreviewReady { preview_id }
            | Self::Revising { preview_id }
            | Self::Publishing { preview_id } => Some(preview_id),
            Self::Idle | Self::Fetching | Self::Summarizing | Self::Published => None,
        }
    }
}

/// Result of submitting a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The repository was summarised and a preview is ready for review.
    PreviewCreated(PreviewEntry),
    /// The model declined to summarise the repository.
    Rejected(RejectedRepository),
    /// The pipeline failed; the message is safe to show the operator.
    Failed {
        /// Operator-facing failure description.
        message: String,
    },
}

/// Result of requesting a revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviseOutcome {
    /// The preview was replaced with the revised content.
    Revised(PreviewEntry),
    /// The model rejected the project on revision; the prior preview stands.
    Rejected(RejectedRepository),
    /// The preview expired before the revision landed.
    Expired,
    /// There is no preview to revise.
    NoActivePreview,
    /// The revision failed; the prior preview stands.
    Failed {
        /// Operator-facing failure description.
        message: String,
    },
}

/// Result of requesting publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The post was published and the preview released.
    Published(MessageRef),
    /// The preview expired before publication.
    Expired,
    /// There is no preview to publish.
    NoActivePreview,
    /// Publishing failed; the preview is untouched and may be retried.
    Failed {
        /// Operator-facing failure description.
        message: String,
    },
}

/// Result of cancelling the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// A pending preview was discarded.
    Cancelled,
    /// There was nothing to cancel.
    NothingPending,
}

/// Shared collaborators of every conversation.
#[derive(Clone)]
pub struct PipelineDeps {
    /// Fetcher used for github.com URLs.
    pub github: Arc<dyn RepositoryFetcher>,
    /// Fetcher used for gitlab.com URLs.
    pub gitlab: Arc<dyn RepositoryFetcher>,
    /// Initial summary agent.
    pub summary_agent: SummaryAgent,
    /// Revision agent.
    pub revision_agent: RevisionAgent,
    /// Shared preview store.
    pub registry: PreviewRegistry,
    /// Banner image renderer.
    pub banner: Arc<dyn BannerRenderer>,
    /// Channel publisher.
    pub publisher: Arc<dyn ChannelPublisher>,
}

impl PipelineDeps {
    fn fetcher_for(&self, platform: RepositoryPlatform) -> &dyn RepositoryFetcher {
        match platform {
            RepositoryPlatform::GitHub => self.github.as_ref(),
            RepositoryPlatform::GitLab => self.gitlab.as_ref(),
        }
    }
}

/// One operator conversation moving a repository URL towards a published
/// post.
pub struct PostWorkflow {
    deps: Arc<PipelineDeps>,
    state: ConversationState,
}

impl PostWorkflow {
    /// Starts a fresh conversation in the idle state.
    #[must_use]
    pub const fn new(deps: Arc<PipelineDeps>) -> Self {
        Self {
            deps,
            state: ConversationState::Idle,
        }
    }

    /// Current position in the pipeline.
    #[must_use]
    pub const fn state(&self) -> ConversationState {
        self.state
    }

    /// Handles a submitted repository URL.
    ///
    /// A preview pending from an earlier submission is discarded first: the
    /// newest URL always wins the conversation.
    pub async fn command(&mut self, url: &str) -> CommandOutcome {
        self.abandon_pending_preview();

        self.state = ConversationState::Fetching;
        let locator = match RepositoryLocator::parse(url) {
            Ok(locator) => locator,
            Err(error) => {
                self.state = ConversationState::Idle;
                return CommandOutcome::Failed {
                    message: error.to_string(),
                };
            }
        };

        let fetcher = self.deps.fetcher_for(locator.platform());
        let repository = match fetcher
            .fetch_repository(locator.owner(), locator.name())
            .await
        {
            Ok(repository) => repository,
            Err(error) => {
                tracing::warn!(url, error = %error, "repository fetch failed");
                self.state = ConversationState::Idle;
                return CommandOutcome::Failed {
                    message: error.to_string(),
                };
            }
        };

        self.state = ConversationState::Summarizing;
        let summary = match self.deps.summary_agent.summarize(&repository).await {
            Ok(SummaryOutput::Summary(summary)) => summary,
            Ok(SummaryOutput::Rejected(rejection)) => {
                tracing::info!(
                    repository = %repository.full_name(),
                    reason = ?rejection.reason,
                    "repository rejected"
                );
                self.state = ConversationState::Idle;
                return CommandOutcome::Rejected(rejection);
            }
            Err(error) => {
                tracing::warn!(
                    repository = %repository.full_name(),
                    error = %error,
                    "summary generation failed"
                );
                self.state = ConversationState::Idle;
                return CommandOutcome::Failed {
                    message: error.to_string(),
                };
            }
        };

        let draft = match self.build_draft(repository, summary) {
            Ok(draft) => draft,
            Err(message) => {
                self.state = ConversationState::Idle;
                return CommandOutcome::Failed { message };
            }
        };

        let entry = self.deps.registry.store(draft);
        self.state = ConversationState::PreviewReady {
            preview_id: entry.id,
        };
        CommandOutcome::PreviewCreated(entry)
    }

    /// Applies an operator edit request to the pending preview.
    ///
    /// The stored preview only changes when the revision fully succeeds; on
    /// any failure the prior content stands and remains publishable.
    pub async fn revise(&mut self, instructions: &str) -> ReviseOutcome {
        let ConversationState::PreviewReady { preview_id } = self.state else {
            return ReviseOutcome::NoActivePreview;
        };

        let Some(entry) = self.deps.registry.get(preview_id) else {
            self.state = ConversationState::Idle;
            return ReviseOutcome::Expired;
        };

        self.state = ConversationState::Revising { preview_id };
        let revised = match self
            .deps
            .revision_agent
            .revise(&entry.repository, &entry.summary, instructions)
            .await
        {
            Ok(SummaryOutput::Summary(summary)) => summary,
            Ok(SummaryOutput::Rejected(rejection)) => {
                self.state = ConversationState::PreviewReady { preview_id };
                return ReviseOutcome::Rejected(rejection);
            }
            Err(error) => {
                tracing::warn!(preview_id = %preview_id, error = %error, "revision failed");
                self.state = ConversationState::PreviewReady { preview_id };
                return ReviseOutcome::Failed {
                    message: error.to_string(),
                };
            }
        };

        let draft = match self.build_draft(entry.repository, revised) {
            Ok(draft) => draft,
            Err(message) => {
                self.state = ConversationState::PreviewReady { preview_id };
                return ReviseOutcome::Failed { message };
            }
        };

        match self.deps.registry.replace(preview_id, draft) {
            Ok(replaced) => {
                self.state = ConversationState::PreviewReady { preview_id };
                ReviseOutcome::Revised(replaced)
            }
            Err(_not_found) => {
                self.state = ConversationState::Idle;
                ReviseOutcome::Expired
            }
        }
    }

    /// Publishes the pending preview to the channel.
    ///
    /// The preview is released only after the channel confirms the post, so
    /// a failed publish can simply be retried.
    pub async fn publish(&mut self) -> PublishOutcome {
        let ConversationState::PreviewReady { preview_id } = self.state else {
            return PublishOutcome::NoActivePreview;
        };

        let Some(entry) = self.deps.registry.get(preview_id) else {
            self.state = ConversationState::Idle;
            return PublishOutcome::Expired;
        };

        self.state = ConversationState::Publishing { preview_id };
        match self
            .deps
            .publisher
            .publish(&entry.banner_png, &entry.caption)
            .await
        {
            Ok(message) => {
                self.deps.registry.delete(preview_id);
                self.state = ConversationState::Published;
                tracing::info!(
                    repository = %entry.repository.full_name(),
                    chat_id = message.chat_id,
                    message_id = message.message_id,
                    "post published"
                );
                PublishOutcome::Published(message)
            }
            Err(error) => {
                tracing::warn!(preview_id = %preview_id, error = %error, "publishing failed");
                self.state = ConversationState::PreviewReady { preview_id };
                PublishOutcome::Failed {
                    message: error.to_string(),
                }
            }
        }
    }

    /// Abandons the conversation, discarding any pending preview and
    /// resetting to idle.
    ///
    /// Cancelling twice, or with nothing pending, is harmless.
    pub fn cancel(&mut self) -> CancelOutcome {
        let had_preview = self.abandon_pending_preview();
        self.state = ConversationState::Idle;
        if had_preview {
            CancelOutcome::Cancelled
        } else {
            CancelOutcome::NothingPending
        }
    }

    fn abandon_pending_preview(&mut self) -> bool {
        let Some(preview_id) = self.state.preview_id() else {
            return false;
        };
        self.deps.registry.delete(preview_id);
        true
    }

    fn build_draft(
        &self,
        repository: RepositoryInfo,
        summary: RepositorySummary,
    ) -> Result<PreviewDraft, String> {
        let caption = render_post_caption(&repository, &summary)
            .map_err(|error| error.to_string())?;
        let banner_png = self
            .deps
            .banner
            .render(&repository, &summary)
            .map_err(|error| error.to_string())?;
        Ok(PreviewDraft {
            repository,
            summary,
            caption,
            banner_png,
        })
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
