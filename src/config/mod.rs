//! Application configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.droidpress.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `DROIDPRESS_REPOSITORY_URL`,
//!    `DROIDPRESS_AI_API_KEY`, or the legacy `GITHUB_TOKEN`, `GITLAB_TOKEN`,
//!    and `OPENAI_API_KEY`
//! 4. **Command-line arguments** – `--repository-url`/`-u` and friends
//!
//! # Configuration File
//!
//! Place `.droidpress.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! repository_url = "https://github.com/owner/repo"
//! ai_models = "gpt-4.1,gpt-4.1-mini"
//! summary_deadline_seconds = 120
//! preview_ttl_seconds = 1800
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::ModelChain;

const DEFAULT_AI_MODELS: &str = "gpt-4.1,gpt-4.1-mini";
const DEFAULT_SUMMARY_DEADLINE_SECONDS: u64 = 120;
const DEFAULT_PREVIEW_TTL_SECONDS: u64 = 1_800;

/// Errors surfaced while resolving configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No AI API key was provided by any source.
    #[error("an AI API key is required (set DROIDPRESS_AI_API_KEY or OPENAI_API_KEY)")]
    MissingAiApiKey,
    /// No repository URL was provided by any source.
    #[error("a repository URL is required (use --repository-url or -u)")]
    MissingRepositoryUrl,
    /// A configured value could not be used.
    #[error("configuration error: {message}")]
    Invalid {
        /// What was wrong with the value.
        message: String,
    },
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `DROIDPRESS_REPOSITORY_URL` or `--repository-url`: Repository URL
/// - `DROIDPRESS_GITHUB_TOKEN`, `GITHUB_TOKEN`, or `--github-token`
/// - `DROIDPRESS_GITLAB_TOKEN`, `GITLAB_TOKEN`, or `--gitlab-token`
/// - `DROIDPRESS_AI_API_KEY`, `OPENAI_API_KEY`, or `--ai-api-key`
/// - `DROIDPRESS_AI_BASE_URL` or `--ai-base-url`: OpenAI-compatible API base
/// - `DROIDPRESS_AI_MODELS` or `--ai-models`: Comma-separated fallback chain
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "DROIDPRESS",
    discovery(
        dotfile_name = ".droidpress.toml",
        config_file_name = "droidpress.toml",
        app_name = "droidpress"
    )
)]
pub struct DroidpressConfig {
    /// Repository URL to fetch and summarise.
    #[ortho_config(cli_short = 'u')]
    pub repository_url: Option<String>,

    /// Personal access token for the GitHub API.
    ///
    /// Optional: unauthenticated requests work within GitHub's public rate
    /// limits. Falls back to the `GITHUB_TOKEN` environment variable.
    #[ortho_config()]
    pub github_token: Option<String>,

    /// Personal access token for the GitLab API.
    ///
    /// Optional. Falls back to the `GITLAB_TOKEN` environment variable.
    #[ortho_config()]
    pub gitlab_token: Option<String>,

    /// API key for the OpenAI-compatible summarization endpoint.
    ///
    /// Falls back to the `OPENAI_API_KEY` environment variable.
    #[ortho_config(cli_short = 'k')]
    pub ai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    ///
    /// Defaults to `https://api.openai.com/v1`; point this at any provider
    /// that speaks the chat-completions protocol.
    #[ortho_config()]
    pub ai_base_url: Option<String>,

    /// Comma-separated model identifiers, strongest first.
    ///
    /// The summarizer tries them in order, advancing on transient failures.
    #[ortho_config(cli_short = 'm')]
    pub ai_models: String,

    /// Deadline for one whole summary or revision attempt chain, in seconds.
    #[ortho_config()]
    pub summary_deadline_seconds: u64,

    /// How long a preview survives without being published, in seconds.
    #[ortho_config()]
    pub preview_ttl_seconds: u64,

    /// Destination channel identifier for published posts.
    #[ortho_config(cli_short = 'c')]
    pub channel_id: Option<i64>,
}

impl Default for DroidpressConfig {
    fn default() -> Self {
        Self {
            repository_url: None,
            github_token: None,
            gitlab_token: None,
            ai_api_key: None,
            ai_base_url: None,
            ai_models: DEFAULT_AI_MODELS.to_owned(),
            summary_deadline_seconds: DEFAULT_SUMMARY_DEADLINE_SECONDS,
            preview_ttl_seconds: DEFAULT_PREVIEW_TTL_SECONDS,
            channel_id: None,
        }
    }
}

impl DroidpressConfig {
    /// Returns the repository URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRepositoryUrl`] when no URL is
    /// configured.
    pub fn require_repository_url(&self) -> Result<&str, ConfigError> {
        self.repository_url
            .as_deref()
            .ok_or(ConfigError::MissingRepositoryUrl)
    }

    /// Resolves the GitHub token from configuration or the legacy
    /// `GITHUB_TOKEN` environment variable.
    #[must_use]
    pub fn resolve_github_token(&self) -> Option<String> {
        self.github_token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
    }

    /// Resolves the GitLab token from configuration or the legacy
    /// `GITLAB_TOKEN` environment variable.
    #[must_use]
    pub fn resolve_gitlab_token(&self) -> Option<String> {
        self.gitlab_token
            .clone()
            .or_else(|| env::var("GITLAB_TOKEN").ok())
    }

    /// Resolves the AI API key from configuration or the conventional
    /// `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAiApiKey`] when no source provides a
    /// value.
    pub fn resolve_ai_api_key(&self) -> Result<String, ConfigError> {
        self.ai_api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .ok_or(ConfigError::MissingAiApiKey)
    }

    /// Builds the model fallback chain from the configured list and deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the model list is empty.
    pub fn model_chain(&self) -> Result<ModelChain, ConfigError> {
        let models: Vec<String> = self
            .ai_models
            .split(',')
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        if models.is_empty() {
            return Err(ConfigError::Invalid {
                message: "ai_models must name at least one model".to_owned(),
            });
        }
        Ok(ModelChain::new(models, self.summary_deadline()))
    }

    /// Deadline for one whole summary attempt chain.
    #[must_use]
    pub const fn summary_deadline(&self) -> Duration {
        Duration::from_secs(self.summary_deadline_seconds)
    }

    /// How long previews survive without being published.
    #[must_use]
    pub const fn preview_ttl(&self) -> Duration {
        Duration::from_secs(self.preview_ttl_seconds)
    }
}
