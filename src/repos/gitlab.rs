//! GitLab v4 repository fetcher.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use super::RepositoryFetcher;
use super::error::FetchError;
use super::http::{ApiResponse, get_json, get_text};
use super::locator::{RepositoryName, RepositoryOwner, RepositoryPlatform};
use super::models::{ApiGitLabProject, RepositoryInfo};

const AGENT: &str = concat!("droidpress/", env!("CARGO_PKG_VERSION"));

/// README file names probed on the default branch, in preference order.
const README_CANDIDATES: [&str; 4] = ["README.md", "README.MD", "README.rst", "README"];

/// Fetcher for projects hosted on gitlab.com.
#[derive(Debug, Clone)]
pub struct GitLabFetcher {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

impl GitLabFetcher {
    /// Creates a fetcher against the public GitLab API.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the default API base fails to
    /// parse, which indicates a programming error rather than bad input.
    pub fn new(client: Client, token: Option<String>) -> Result<Self, FetchError> {
        let api_base = Url::parse(RepositoryPlatform::GitLab.api_base()).map_err(|error| {
            FetchError::InvalidUrl {
                url: RepositoryPlatform::GitLab.api_base().to_owned(),
                reason: error.to_string(),
            }
        })?;
        Ok(Self::with_api_base(client, token, api_base))
    }

    /// Creates a fetcher against a custom API base, used for self-hosted
    /// instances and HTTP test doubles.
    #[must_use]
    pub const fn with_api_base(client: Client, token: Option<String>, api_base: Url) -> Self {
        Self {
            client,
            api_base,
            token,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.api_base.as_str().trim_end_matches('/'));
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, AGENT);
        if let Some(token) = self.token.as_deref() {
            request = request.header("PRIVATE-TOKEN", token);
        }
        request
    }

    async fn load_project(
        &self,
        owner: &RepositoryOwner,
        name: &RepositoryName,
    ) -> Result<ApiGitLabProject, FetchError> {
        let path = format!("/projects/{}", encode_project_path(owner, name));
        match get_json(self.get(&path), RepositoryPlatform::GitLab).await? {
            ApiResponse::Ok(project) => Ok(project),
            ApiResponse::NotFound => Err(FetchError::NotFound {
                platform: RepositoryPlatform::GitLab,
                owner: owner.as_str().to_owned(),
                name: name.as_str().to_owned(),
            }),
        }
    }

    /// Probes the raw-file endpoint for a README on the default branch.
    ///
    /// `ref=HEAD` resolves the default branch server-side, so this call can
    /// run concurrently with the project metadata call.
    async fn load_readme(
        &self,
        owner: &RepositoryOwner,
        name: &RepositoryName,
    ) -> Result<Option<String>, FetchError> {
        let project = encode_project_path(owner, name);
        for candidate in README_CANDIDATES {
            let path = format!("/projects/{project}/repository/files/{candidate}/raw?ref=HEAD");
            match get_text(self.get(&path), RepositoryPlatform::GitLab).await? {
                ApiResponse::Ok(content) if !content.trim().is_empty() => {
                    return Ok(Some(content));
                }
                ApiResponse::Ok(_) | ApiResponse::NotFound => {}
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl RepositoryFetcher for GitLabFetcher {
    async fn fetch_repository(
        &self,
        owner: &RepositoryOwner,
        name: &RepositoryName,
    ) -> Result<RepositoryInfo, FetchError> {
        tracing::info!(owner = owner.as_str(), name = name.as_str(), "fetching GitLab project");

        let (project, readme) = tokio::try_join!(
            self.load_project(owner, name),
            self.load_readme(owner, name),
        )?;

        let namespace = project
            .namespace
            .and_then(|namespace| namespace.full_path)
            .unwrap_or_else(|| owner.as_str().to_owned());

        Ok(RepositoryInfo {
            platform: RepositoryPlatform::GitLab,
            owner: namespace.clone(),
            name: project.path,
            description: project.description.filter(|text| !text.trim().is_empty()),
            // GitLab only exposes languages through a separate endpoint; the
            // snapshot leaves it unset rather than issuing a third call.
            language: None,
            stars: project.star_count.unwrap_or(0),
            license: project.license.and_then(|license| license.key),
            default_branch: project.default_branch.unwrap_or_else(|| "main".to_owned()),
            web_url: project.web_url.unwrap_or_else(|| {
                format!("https://gitlab.com/{namespace}/{}", name.as_str())
            }),
            topics: project.topics.unwrap_or_default(),
            readme,
        })
    }
}

/// URL-encodes the `owner/name` project path for the v4 API, which expects
/// the namespace separator itself to be percent-encoded.
fn encode_project_path(owner: &RepositoryOwner, name: &RepositoryName) -> String {
    let raw = format!("{}/{}", owner.as_str(), name.as_str());
    let mut encoded = String::with_capacity(raw.len());
    for character in raw.chars() {
        match character {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => encoded.push(character),
            _ => {
                let mut buffer = [0_u8; 4];
                for byte in character.encode_utf8(&mut buffer).bytes() {
                    encoded.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::encode_project_path;
    use crate::repos::locator::{RepositoryName, RepositoryOwner};

    #[test]
    fn encode_project_path_escapes_namespace_separators() {
        let owner = RepositoryOwner::new("group/subgroup").expect("owner should validate");
        let name = RepositoryName::new("project").expect("name should validate");

        assert_eq!(encode_project_path(&owner, &name), "group%2Fsubgroup%2Fproject");
    }

    #[test]
    fn encode_project_path_leaves_unreserved_characters() {
        let owner = RepositoryOwner::new("some-group").expect("owner should validate");
        let name = RepositoryName::new("my_project.rs").expect("name should validate");

        assert_eq!(encode_project_path(&owner, &name), "some-group%2Fmy_project.rs");
    }
}
