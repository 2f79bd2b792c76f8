//! GitHub v3 repository fetcher.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use url::Url;

use super::RepositoryFetcher;
use super::error::FetchError;
use super::http::{ApiResponse, get_json};
use super::locator::{RepositoryName, RepositoryOwner, RepositoryPlatform};
use super::models::{ApiGitHubReadme, ApiGitHubRepository, RepositoryInfo};

const API_VERSION: &str = "2022-11-28";
const AGENT: &str = concat!("droidpress/", env!("CARGO_PKG_VERSION"));

/// Fetcher for repositories hosted on github.com.
#[derive(Debug, Clone)]
pub struct GitHubFetcher {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

impl GitHubFetcher {
    /// Creates a fetcher against the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the default API base fails to
    /// parse, which indicates a programming error rather than bad input.
    pub fn new(client: Client, token: Option<String>) -> Result<Self, FetchError> {
        let api_base = Url::parse(RepositoryPlatform::GitHub.api_base()).map_err(|error| {
            FetchError::InvalidUrl {
                url: RepositoryPlatform::GitHub.api_base().to_owned(),
                reason: error.to_string(),
            }
        })?;
        Ok(Self::with_api_base(client, token, api_base))
    }

    /// Creates a fetcher against a custom API base, used for GitHub
    /// Enterprise hosts and HTTP test doubles.
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
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, AGENT)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = self.token.as_deref() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }

    async fn load_metadata(
        &self,
        owner: &RepositoryOwner,
        name: &RepositoryName,
    ) -> Result<ApiGitHubRepository, FetchError> {
        let path = format!("/repos/{}/{}", owner.as_str(), name.as_str());
        match get_json(self.get(&path), RepositoryPlatform::GitHub).await? {
            ApiResponse::Ok(repository) => Ok(repository),
            ApiResponse::NotFound => Err(FetchError::NotFound {
                platform: RepositoryPlatform::GitHub,
                owner: owner.as_str().to_owned(),
                name: name.as_str().to_owned(),
            }),
        }
    }

    async fn load_readme(
        &self,
        owner: &RepositoryOwner,
        name: &RepositoryName,
    ) -> Result<Option<String>, FetchError> {
        let path = format!("/repos/{}/{}/readme", owner.as_str(), name.as_str());
        let readme: ApiGitHubReadme =
            match get_json(self.get(&path), RepositoryPlatform::GitHub).await? {
                ApiResponse::Ok(readme) => readme,
                ApiResponse::NotFound => return Ok(None),
            };

        let Some(encoded) = readme.content.filter(|content| !content.is_empty()) else {
            return Ok(None);
        };

        match readme.encoding.as_deref() {
            Some("base64") | None => decode_readme(&encoded).map(Some),
            Some(_) => Ok(Some(encoded)),
        }
    }
}

#[async_trait]
impl RepositoryFetcher for GitHubFetcher {
    async fn fetch_repository(
        &self,
        owner: &RepositoryOwner,
        name: &RepositoryName,
    ) -> Result<RepositoryInfo, FetchError> {
        tracing::info!(owner = owner.as_str(), name = name.as_str(), "fetching GitHub repository");

        let (metadata, readme) = tokio::try_join!(
            self.load_metadata(owner, name),
            self.load_readme(owner, name),
        )?;

        let resolved_owner = metadata
            .owner
            .and_then(|api_owner| api_owner.login)
            .unwrap_or_else(|| owner.as_str().to_owned());

        Ok(RepositoryInfo {
            platform: RepositoryPlatform::GitHub,
            owner: resolved_owner,
            name: metadata.name,
            description: metadata.description,
            language: metadata.language,
            stars: metadata.stargazers_count.unwrap_or(0),
            license: metadata
                .license
                .and_then(|license| license.spdx_id)
                .filter(|id| id != "NOASSERTION"),
            default_branch: metadata
                .default_branch
                .unwrap_or_else(|| "main".to_owned()),
            web_url: metadata.html_url.unwrap_or_else(|| {
                format!("https://github.com/{}/{}", owner.as_str(), name.as_str())
            }),
            topics: metadata.topics.unwrap_or_default(),
            readme,
        })
    }
}

/// Decodes the base64 README payload GitHub returns.
///
/// The payload is line-wrapped, so whitespace is stripped before decoding;
/// invalid UTF-8 is replaced rather than rejected.
fn decode_readme(payload: &str) -> Result<String, FetchError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(compact).map_err(|error| FetchError::Client {
        platform: RepositoryPlatform::GitHub,
        status: None,
        details: format!("README content could not be decoded: {error}"),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::decode_readme;

    #[test]
    fn decode_readme_handles_line_wrapped_base64() {
        let encoded = "IyBIZWxs\nbyBXb3Js\nZAo=";
        assert_eq!(decode_readme(encoded).expect("payload should decode"), "# Hello World\n");
    }

    #[test]
    fn decode_readme_rejects_garbage() {
        assert!(decode_readme("!!not-base64!!").is_err());
    }
}
