//! Prompt context assembly from repository snapshots.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::repos::RepositoryInfo;

use super::output::{ProjectTag, RepositorySummary};

/// README excerpts are capped so one giant README cannot crowd the model's
/// context window.
const MAX_README_CHARS: usize = 16_000;

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://[^\s)]+").unwrap());

/// Truncates the README to the excerpt cap on a char boundary.
pub(super) fn readme_excerpt(repository: &RepositoryInfo) -> String {
    let Some(content) = repository.readme.as_deref() else {
        return String::new();
    };
    let trimmed = content.trim();
    if trimmed.chars().count() <= MAX_README_CHARS {
        return trimmed.to_owned();
    }

    let cut: String = trimmed.chars().take(MAX_README_CHARS).collect();
    format!("{}...", cut.trim_end())
}

/// Extracts unique absolute URLs from README text, preserving order.
pub(super) fn extract_links(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for found in URL_PATTERN.find_iter(text) {
        let url = found
            .as_str()
            .trim_end_matches(['.', ',', ')', ';', ']', '"', '\''])
            .to_owned();
        if !url.is_empty() && seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}

/// Renders the repository data block shared by both agents.
pub(super) fn repository_context(repository: &RepositoryInfo) -> String {
    let mut parts = String::from("## Repository Data\n\n");
    let _ = writeln!(parts, "**Name:** {}", repository.name);
    let _ = writeln!(parts, "**Full Name:** {}", repository.full_name());
    let _ = writeln!(parts, "**Platform:** {}", repository.platform);
    let _ = writeln!(
        parts,
        "**Description:** {}",
        repository.description.as_deref().unwrap_or("Not provided")
    );
    if let Some(language) = repository.language.as_deref() {
        let _ = writeln!(parts, "**Primary Language:** {language}");
    }
    let _ = writeln!(parts, "**Stars:** {}", repository.stars);
    if let Some(license) = repository.license.as_deref() {
        let _ = writeln!(parts, "**License:** {license}");
    }
    if !repository.topics.is_empty() {
        let _ = writeln!(parts, "**Topics:** {}", repository.topics.join(", "));
    }
    let _ = writeln!(parts, "**Repository URL:** {}", repository.web_url);
    parts
}

/// Full user turn for the initial summary pass.
pub(super) fn summary_user_prompt(repository: &RepositoryInfo) -> String {
    let excerpt = readme_excerpt(repository);
    let links = extract_links(&excerpt);

    let mut prompt = repository_context(repository);

    prompt.push_str("\n## Allowed Tags (choose 2-4)\n");
    for tag in ProjectTag::all() {
        let _ = writeln!(prompt, "- {}", tag.as_str());
    }

    if !links.is_empty() {
        prompt.push_str("\n## Available Links (select relevant ones)\n");
        for link in &links {
            let _ = writeln!(prompt, "- {link}");
        }
    }

    if !excerpt.is_empty() {
        prompt.push_str(
            "\n## README Content\nUse this to extract features, benefits, and additional context:\n\n",
        );
        prompt.push_str(&excerpt);
        prompt.push('\n');
    }

    prompt.push_str(
        "\nGenerate a summary for this Android project. First verify it is \
         Android-related; if not, answer with the rejected form.",
    );
    prompt
}

/// Full user turn for the revision pass.
pub(super) fn revision_user_prompt(
    repository: &RepositoryInfo,
    current: &RepositorySummary,
    instructions: &str,
) -> String {
    let mut prompt = repository_context(repository);

    prompt.push_str("\n## Current Summary\n");
    let _ = writeln!(prompt, "**Title:** {}", current.title);
    let _ = writeln!(prompt, "**Description:** {}", current.description);
    prompt.push_str("**Key Features:**\n");
    if current.key_features.is_empty() {
        prompt.push_str("- (none provided)\n");
    } else {
        for feature in &current.key_features {
            let _ = writeln!(prompt, "- {feature}");
        }
    }
    prompt.push_str("**Tags:** ");
    let tags: Vec<&str> = current.tags.iter().map(|tag| tag.as_str()).collect();
    prompt.push_str(&tags.join(", "));
    prompt.push('\n');
    prompt.push_str("**Important Links:**\n");
    if current.important_links.is_empty() {
        prompt.push_str("- (none provided)\n");
    } else {
        for link in &current.important_links {
            let _ = writeln!(prompt, "- {}: {}", link.label, link.url);
        }
    }

    prompt.push_str("\nEdit request from the operator:\n");
    prompt.push_str(instructions.trim());
    prompt
}

#[cfg(test)]
mod tests {
    use crate::repos::{RepositoryInfo, RepositoryPlatform};

    use super::{extract_links, readme_excerpt, summary_user_prompt};

    fn repository(readme: Option<&str>) -> RepositoryInfo {
        RepositoryInfo {
            platform: RepositoryPlatform::GitHub,
            owner: "foo".to_owned(),
            name: "bar".to_owned(),
            description: Some("An Android thing".to_owned()),
            language: Some("Kotlin".to_owned()),
            stars: 42,
            license: Some("Apache-2.0".to_owned()),
            default_branch: "main".to_owned(),
            web_url: "https://github.com/foo/bar".to_owned(),
            topics: vec!["android".to_owned()],
            readme: readme.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn extract_links_dedupes_and_strips_trailing_punctuation() {
        let text = "See https://example.com/releases. Also (https://example.com/docs) \
                    and again https://example.com/releases";

        assert_eq!(
            extract_links(text),
            vec![
                "https://example.com/releases".to_owned(),
                "https://example.com/docs".to_owned(),
            ]
        );
    }

    #[test]
    fn readme_excerpt_truncates_long_content() {
        let long = "word ".repeat(10_000);
        let excerpt = readme_excerpt(&repository(Some(&long)));

        assert!(excerpt.chars().count() <= 16_003);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn summary_prompt_includes_metadata_and_readme() {
        let prompt = summary_user_prompt(&repository(Some(
            "An app. Download at https://example.com/apk",
        )));

        assert!(prompt.contains("**Full Name:** foo/bar"));
        assert!(prompt.contains("## Allowed Tags"));
        assert!(prompt.contains("https://example.com/apk"));
        assert!(prompt.contains("## README Content"));
    }

    #[test]
    fn summary_prompt_omits_readme_section_when_absent() {
        let prompt = summary_user_prompt(&repository(None));

        assert!(!prompt.contains("## README Content"));
    }
}
