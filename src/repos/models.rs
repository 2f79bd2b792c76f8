//! Normalised repository metadata and platform API payloads.
//!
//! Types prefixed with `Api` are internal deserialisation targets for the
//! per-platform JSON schemas; they convert into the platform-agnostic
//! [`RepositoryInfo`] snapshot the rest of the pipeline consumes.

use serde::{Deserialize, Serialize};

use super::locator::RepositoryPlatform;

/// Point-in-time snapshot of a repository's metadata.
///
/// Immutable once constructed: owner, name, and platform uniquely identify
/// the fetch target, and the remaining fields reflect the platform's state at
/// fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// Platform the snapshot was taken from.
    pub platform: RepositoryPlatform,
    /// Repository owner or namespace path.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Platform-supplied project description.
    pub description: Option<String>,
    /// Primary language reported by the platform, when available.
    pub language: Option<String>,
    /// Star count at fetch time.
    pub stars: u64,
    /// SPDX license identifier, when the platform reports one.
    pub license: Option<String>,
    /// Default branch name.
    pub default_branch: String,
    /// Browser URL of the project.
    pub web_url: String,
    /// Platform topics/tags attached to the project.
    pub topics: Vec<String>,
    /// README content, when one exists.
    pub readme: Option<String>,
}

impl RepositoryInfo {
    /// `owner/name` path for log lines and prompts.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitHubRepository {
    pub(super) name: String,
    pub(super) description: Option<String>,
    pub(super) language: Option<String>,
    pub(super) stargazers_count: Option<u64>,
    pub(super) license: Option<ApiGitHubLicense>,
    pub(super) default_branch: Option<String>,
    pub(super) html_url: Option<String>,
    pub(super) topics: Option<Vec<String>>,
    pub(super) owner: Option<ApiGitHubOwner>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitHubLicense {
    pub(super) spdx_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitHubOwner {
    pub(super) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitHubReadme {
    pub(super) content: Option<String>,
    pub(super) encoding: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitLabProject {
    pub(super) path: String,
    pub(super) description: Option<String>,
    pub(super) star_count: Option<u64>,
    pub(super) default_branch: Option<String>,
    pub(super) web_url: Option<String>,
    pub(super) topics: Option<Vec<String>>,
    pub(super) namespace: Option<ApiGitLabNamespace>,
    pub(super) license: Option<ApiGitLabLicense>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitLabNamespace {
    pub(super) full_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitLabLicense {
    pub(super) key: Option<String>,
}
