//! Droidpress CLI entrypoint: fetch, summarise, and print a post preview.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use thiserror::Error;

use droidpress::repos::{GitHubFetcher, GitLabFetcher, RepositoryFetcher, build_http_client};
use droidpress::workflow::render_post_caption;
use droidpress::{
    DroidpressConfig, ModelChain, OpenAiConfig, OpenAiProvider, RepositoryLocator,
    RepositoryPlatform, SummaryAgent, SummaryOutput,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] droidpress::ConfigError),
    #[error("{0}")]
    Fetch(#[from] droidpress::FetchError),
    #[error("{0}")]
    Summary(#[from] droidpress::SummaryError),
    #[error("{0}")]
    Caption(#[from] droidpress::workflow::CaptionError),
    #[error("configuration error: {0}")]
    Load(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CliError> {
    let config =
        DroidpressConfig::load().map_err(|error| CliError::Load(error.to_string()))?;

    let url = config.require_repository_url()?;
    let locator = RepositoryLocator::parse(url)?;

    let client = build_http_client()?;
    let repository = match locator.platform() {
        RepositoryPlatform::GitHub => {
            let fetcher = GitHubFetcher::new(client.clone(), config.resolve_github_token())?;
            fetcher
                .fetch_repository(locator.owner(), locator.name())
                .await?
        }
        RepositoryPlatform::GitLab => {
            let fetcher = GitLabFetcher::new(client.clone(), config.resolve_gitlab_token())?;
            fetcher
                .fetch_repository(locator.owner(), locator.name())
                .await?
        }
    };

    let chain: ModelChain = config.model_chain()?;
    let api_key = config.resolve_ai_api_key()?;
    let provider = OpenAiProvider::new(
        client,
        OpenAiConfig::from_overrides(config.ai_base_url.as_deref(), Some(api_key)),
    );
    let agent = SummaryAgent::new(Arc::new(provider), chain);

    let mut stdout = io::stdout().lock();
    match agent.summarize(&repository).await? {
        SummaryOutput::Summary(summary) => {
            let caption = render_post_caption(&repository, &summary)?;
            writeln!(stdout, "{caption}")?;
        }
        SummaryOutput::Rejected(rejection) => {
            writeln!(
                stdout,
                "Repository {} was rejected ({:?}): {}",
                repository.full_name(),
                rejection.reason,
                rejection.explanation
            )?;
        }
    }
    Ok(())
}
