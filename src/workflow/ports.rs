//! Outbound ports the post workflow depends on.

use async_trait::async_trait;
use thiserror::Error;

use crate::ai::RepositorySummary;
use crate::repos::RepositoryInfo;

/// Reference to a message in the destination channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    /// Channel or chat identifier.
    pub chat_id: i64,
    /// Message identifier within the chat.
    pub message_id: i64,
}

/// Errors surfaced while rendering the banner image.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BannerError {
    /// The renderer could not produce an image.
    #[error("banner rendering failed: {0}")]
    Render(String),
}

/// Errors surfaced while publishing to the channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishError {
    /// The channel API rejected or failed the publication.
    #[error("publishing to the channel failed: {0}")]
    Channel(String),
}

/// Renders the banner image shown above a post.
#[cfg_attr(test, mockall::automock)]
pub trait BannerRenderer: Send + Sync {
    /// Produces PNG bytes for the post banner.
    ///
    /// # Errors
    ///
    /// Returns [`BannerError`] when the image cannot be rendered.
    fn render(
        &self,
        repository: &RepositoryInfo,
        summary: &RepositorySummary,
    ) -> Result<Vec<u8>, BannerError>;
}

/// Publishes finished posts to the destination channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// Sends the banner and caption as a single post.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the channel refuses the post.
    async fn publish(&self, banner_png: &[u8], caption: &str) -> Result<MessageRef, PublishError>;
}
