//! Error types exposed by the repository fetching layer.

use thiserror::Error;

use super::locator::RepositoryPlatform;

/// Errors surfaced while parsing repository URLs or communicating with a
/// hosting platform.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The provided repository URL could not be parsed.
    #[error("invalid repository URL '{url}': {reason}")]
    InvalidUrl {
        /// The raw value the operator supplied.
        url: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The platform reported that the repository does not exist.
    #[error("{platform} repository {owner}/{name} was not found")]
    NotFound {
        /// Platform that returned the 404.
        platform: RepositoryPlatform,
        /// Repository owner or namespace path.
        owner: String,
        /// Repository name.
        name: String,
    },

    /// The platform returned a non-success response, or the transport failed.
    ///
    /// `status` is `None` for transport-level failures that never produced an
    /// HTTP response.
    #[error("{platform} API error: {details}")]
    Client {
        /// Platform the request was sent to.
        platform: RepositoryPlatform,
        /// HTTP status code when a response was received.
        status: Option<u16>,
        /// Response body excerpt or transport error detail.
        details: String,
    },

    /// The shared HTTP client could not be constructed, before any platform
    /// was contacted.
    #[error("HTTP client configuration failed: {details}")]
    Configuration {
        /// What failed during client construction.
        details: String,
    },
}
