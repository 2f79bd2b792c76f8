//! OpenAI-compatible chat-completions provider.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::text::excerpt;

use super::output::summary_output_schema;
use super::provider::{ChatCompletionProvider, ChatRequest, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_COMPLETION_TOKENS: u32 = 4000;
const MAX_ERROR_EXCERPT_CHARS: usize = 160;

/// Configuration for [`OpenAiProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// API key used for bearer authentication.
    pub api_key: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
        }
    }
}

impl OpenAiConfig {
    /// Constructs configuration with explicit API settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Builds configuration from optional overrides, defaulting to the
    /// public OpenAI endpoint.
    #[must_use]
    pub fn from_overrides(base_url: Option<&str>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.map_or_else(|| DEFAULT_BASE_URL.to_owned(), ToOwned::to_owned),
            api_key,
        }
    }
}

/// OpenAI-compatible provider over the shared HTTP client.
///
/// The request carries a JSON-schema `response_format` constraint; providers
/// that ignore it still work because responses degrade to parse-and-validate
/// at the chain level.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Creates a provider from the shared client and explicit configuration.
    #[must_use]
    pub const fn new(client: Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Request {
                message: "AI API key is required (set DROIDPRESS_AI_API_KEY or OPENAI_API_KEY)"
                    .to_owned(),
            })
    }
}

#[async_trait]
impl ChatCompletionProvider for OpenAiProvider {
    async fn complete(&self, model: &str, request: &ChatRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;
        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let payload = ChatCompletionsRequest {
            model,
            messages: vec![
                ChatCompletionsMessage {
                    role: "system",
                    content: request.system.clone(),
                },
                ChatCompletionsMessage {
                    role: "user",
                    content: request.user.clone(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.schema_name,
                    schema: summary_output_schema(),
                },
            },
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "(failed to read error response body)".to_owned());
            return Err(classify_status_error(status, &body));
        }

        let decoded: ChatCompletionsResponse =
            response.json().await.map_err(|error| ProviderError::Request {
                message: format!("AI response JSON decoding failed: {error}"),
            })?;

        decoded
            .choices
            .first()
            .and_then(|choice| parse_content_value(&choice.message.content))
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| ProviderError::Request {
                message: "AI response did not contain assistant text".to_owned(),
            })
    }
}

/// Transport failures are worth retrying on the next model: a connect error
/// or timeout says nothing about the model itself.
fn classify_transport_error(error: reqwest::Error) -> ProviderError {
    ProviderError::Transient {
        message: format!("AI request transport failed: {error}"),
    }
}

fn classify_status_error(status: StatusCode, body: &str) -> ProviderError {
    let message = format!(
        "AI request failed with status {}: {}",
        status.as_u16(),
        excerpt(body, MAX_ERROR_EXCERPT_CHARS)
    );
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ProviderError::Transient { message }
    } else {
        ProviderError::Request { message }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionsMessage>,
    response_format: ResponseFormat<'a>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: serde_json::Value,
}

#[derive(Debug, serde::Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, serde::Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, serde::Deserialize)]
struct ChatChoiceMessage {
    content: ChatContent,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, serde::Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod tests;
