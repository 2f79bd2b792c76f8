//! Platform-agnostic repository fetching.
//!
//! This module translates an owner/name pair on a hosting platform into a
//! normalised [`RepositoryInfo`] snapshot. The trait-based design enables
//! mocking in tests while the per-platform implementations handle real HTTP
//! requests over a shared client.

mod error;
mod github;
mod gitlab;
mod http;
mod locator;
mod models;

pub use error::FetchError;
pub use github::GitHubFetcher;
pub use gitlab::GitLabFetcher;
pub use locator::{RepositoryLocator, RepositoryName, RepositoryOwner, RepositoryPlatform};
pub use models::RepositoryInfo;

use std::time::Duration;

use async_trait::async_trait;

/// Fixed deadline applied to every outbound platform request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the shared HTTP client used by all fetchers.
///
/// # Errors
///
/// Returns [`FetchError::Configuration`] when the TLS backend cannot be
/// initialised.
pub fn build_http_client() -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|error| FetchError::Configuration {
            details: error.to_string(),
        })
}

/// Fetcher that can load repository metadata for one platform.
///
/// Each call is a fresh snapshot: implementations never retry and never
/// cache. The metadata and README requests run concurrently and the call
/// resolves only once both complete (a missing README is not a failure).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryFetcher: Send + Sync {
    /// Fetches the repository snapshot for `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when the platform reports 404 for the
    /// repository itself, and [`FetchError::Client`] for any other non-2xx
    /// response or transport failure.
    async fn fetch_repository(
        &self,
        owner: &RepositoryOwner,
        name: &RepositoryName,
    ) -> Result<RepositoryInfo, FetchError>;
}
