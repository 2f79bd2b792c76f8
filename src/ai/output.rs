//! Structured summary output and its validation.
//!
//! The model must answer with exactly one of two variants: a usable summary
//! or a structured rejection. Responses are validated against this schema;
//! unrecognised extra fields are ignored, anything that cannot be coerced is
//! a validation failure.

use serde::{Deserialize, Serialize};

/// Category tags a summary may carry, mirroring the channel's tag
/// conventions. The model must pick from this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectTag {
    /// Two-factor authentication tools.
    #[serde(rename = "2FA")]
    TwoFa,
    /// AI assistants and chat clients.
    #[serde(rename = "AI_Chat")]
    AiChat,
    /// Alternative app stores and installers.
    #[serde(rename = "App_Store")]
    AppStore,
    /// Automation and scripting tools.
    Automation,
    /// Web browsers.
    Browser,
    /// Developer tooling and libraries.
    Development,
    /// Cloud storage and sync clients.
    #[serde(rename = "Cloud_Storage")]
    CloudStorage,
    /// File transfer utilities.
    #[serde(rename = "File_Transfer")]
    FileTransfer,
    /// Photo and media galleries.
    Gallery,
    /// Games.
    Games,
    /// On-screen keyboards.
    Keyboard,
    /// Home screen launchers.
    Launcher,
    /// Media players for local content.
    #[serde(rename = "Local_Media_Player")]
    LocalMediaPlayer,
    /// Messaging and chat clients.
    Messaging,
    /// Music and multimedia tools.
    Multimedia,
    /// Note taking.
    Note,
    /// Password managers.
    Password,
    /// Podcast players.
    Podcast,
    /// Privacy and security tools.
    Security,
    /// System utilities and tweaks.
    System,
    /// Theming and customisation.
    Theming,
    /// App updaters.
    Updater,
    /// VPN clients.
    #[serde(rename = "VPN")]
    Vpn,
    /// Weather apps.
    Weather,
    /// Xposed framework modules.
    Xposed,
}

impl ProjectTag {
    /// All allowed tags, in prompt order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TwoFa,
            Self::AiChat,
            Self::AppStore,
            Self::Automation,
            Self::Browser,
            Self::Development,
            Self::CloudStorage,
            Self::FileTransfer,
            Self::Gallery,
            Self::Games,
            Self::Keyboard,
            Self::Launcher,
            Self::LocalMediaPlayer,
            Self::Messaging,
            Self::Multimedia,
            Self::Note,
            Self::Password,
            Self::Podcast,
            Self::Security,
            Self::System,
            Self::Theming,
            Self::Updater,
            Self::Vpn,
            Self::Weather,
            Self::Xposed,
        ]
    }

    /// Wire name of the tag, as used in prompts and captions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoFa => "2FA",
            Self::AiChat => "AI_Chat",
            Self::AppStore => "App_Store",
            Self::Automation => "Automation",
            Self::Browser => "Browser",
            Self::Development => "Development",
            Self::CloudStorage => "Cloud_Storage",
            Self::FileTransfer => "File_Transfer",
            Self::Gallery => "Gallery",
            Self::Games => "Games",
            Self::Keyboard => "Keyboard",
            Self::Launcher => "Launcher",
            Self::LocalMediaPlayer => "Local_Media_Player",
            Self::Messaging => "Messaging",
            Self::Multimedia => "Multimedia",
            Self::Note => "Note",
            Self::Password => "Password",
            Self::Podcast => "Podcast",
            Self::Security => "Security",
            Self::System => "System",
            Self::Theming => "Theming",
            Self::Updater => "Updater",
            Self::Vpn => "VPN",
            Self::Weather => "Weather",
            Self::Xposed => "Xposed",
        }
    }
}

/// A labelled link the summary wants included in the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantLink {
    /// Descriptive label, e.g. "F-Droid" or "Download (Latest Release)".
    pub label: String,
    /// Absolute URL.
    pub url: String,
}

/// Generated summary of an Android project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Display title for the post.
    pub title: String,
    /// Two-to-three sentence description.
    pub description: String,
    /// Three-to-four bullet features.
    pub key_features: Vec<String>,
    /// Category tags chosen from [`ProjectTag::all`].
    pub tags: Vec<ProjectTag>,
    /// Links worth surfacing in the post.
    #[serde(default)]
    pub important_links: Vec<ImportantLink>,
}

/// Machine-readable reason a repository was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// The project is not Android-related.
    NotAndroid,
    /// Metadata and README were too thin to summarise.
    InsufficientInformation,
    /// Any other reason the model reports.
    #[serde(other)]
    Other,
}

/// Structured refusal to summarise a repository.
///
/// This is an expected business outcome, not an error: callers branch on the
/// [`SummaryOutput`] variant rather than on failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRepository {
    /// Reason code.
    pub reason: RejectionReason,
    /// Human-readable explanation suitable for the operator.
    pub explanation: String,
}

/// Tagged union the model must produce: a summary or a rejection, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryOutput {
    /// The repository is Android-related and was summarised.
    Summary(RepositorySummary),
    /// The repository was rejected with a structured reason.
    Rejected(RejectedRepository),
}

/// Parses and validates a model response into a [`SummaryOutput`].
///
/// Providers that honour the schema constraint return bare JSON; providers
/// that degrade to free text may wrap the object in prose or a code fence,
/// so a second pass extracts the outermost JSON object before giving up.
///
/// # Errors
///
/// Returns a human-readable reason when the payload cannot be coerced into
/// either variant.
pub fn parse_summary_output(text: &str) -> Result<SummaryOutput, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("response contained no content".to_owned());
    }

    match serde_json::from_str::<SummaryOutput>(trimmed) {
        Ok(output) => Ok(output),
        Err(direct_error) => {
            let Some(embedded) = extract_json_object(trimmed) else {
                return Err(direct_error.to_string());
            };
            serde_json::from_str::<SummaryOutput>(embedded).map_err(|error| error.to_string())
        }
    }
}

/// Returns the outermost `{ ... }` span of `text`, if any.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// JSON schema for [`SummaryOutput`], sent as the provider's structured
/// output constraint.
#[must_use]
pub fn summary_output_schema() -> serde_json::Value {
    let tags: Vec<&str> = ProjectTag::all().iter().map(|tag| tag.as_str()).collect();
    serde_json::json!({
        "type": "object",
        "properties": {
            "kind": { "type": "string", "enum": ["summary", "rejected"] },
            "title": { "type": "string" },
            "description": { "type": "string" },
            "key_features": { "type": "array", "items": { "type": "string" } },
            "tags": { "type": "array", "items": { "type": "string", "enum": tags } },
            "important_links": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "label": { "type": "string" },
                        "url": { "type": "string" }
                    },
                    "required": ["label", "url"]
                }
            },
            "reason": {
                "type": "string",
                "enum": ["not_android", "insufficient_information", "other"]
            },
            "explanation": { "type": "string" }
        },
        "required": ["kind"]
    })
}
