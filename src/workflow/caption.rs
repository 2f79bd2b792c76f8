//! HTML caption rendering for channel posts.

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::ai::RepositorySummary;
use crate::repos::RepositoryInfo;

/// Post caption layout. Rendered with HTML auto-escaping so model-provided
/// text cannot inject markup.
const CAPTION_TEMPLATE: &str = "\
<b>{{ title }}</b>

<i>{{ description }}</i>
{% if features %}
\u{2728} <b>Key Features</b>
{% for feature in features %}\u{25aa}\u{fe0f} {{ feature }}
{% endfor %}{% endif %}
\u{1f517} <b>Links</b>
{% for link in links %}\u{25aa}\u{fe0f} <a href=\"{{ link.url }}\">{{ link.label }}</a>
{% endfor %}
\u{1f3f7} {% for tag in tags %}#{{ tag }}{% if not loop.last %} {% endif %}{% endfor %}";

/// Errors surfaced while rendering the caption.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptionError {
    /// The template failed to parse or render.
    #[error("caption rendering failed: {message}")]
    RenderFailed {
        /// Underlying template engine message.
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct CaptionLink {
    label: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct CaptionContext {
    title: String,
    description: String,
    features: Vec<String>,
    links: Vec<CaptionLink>,
    tags: Vec<&'static str>,
}

/// Renders the HTML caption for a post.
///
/// The repository's own page always leads the link list; summary links
/// follow, deduplicated by URL.
///
/// # Errors
///
/// Returns [`CaptionError::RenderFailed`] when the template cannot be
/// rendered.
pub fn render_post_caption(
    repository: &RepositoryInfo,
    summary: &RepositorySummary,
) -> Result<String, CaptionError> {
    let mut env = Environment::new();
    env.add_template("caption.html", CAPTION_TEMPLATE)
        .map_err(|error| CaptionError::RenderFailed {
            message: error.to_string(),
        })?;

    let mut links = vec![CaptionLink {
        label: repository.platform.display_name().to_owned(),
        url: repository.web_url.clone(),
    }];
    for link in &summary.important_links {
        if links.iter().any(|existing| existing.url == link.url) {
            continue;
        }
        links.push(CaptionLink {
            label: link.label.clone(),
            url: link.url.clone(),
        });
    }

    let caption_context = CaptionContext {
        title: summary.title.clone(),
        description: summary.description.clone(),
        features: summary.key_features.clone(),
        links,
        tags: summary.tags.iter().map(|tag| tag.as_str()).collect(),
    };

    let template = env
        .get_template("caption.html")
        .map_err(|error| CaptionError::RenderFailed {
            message: error.to_string(),
        })?;
    template
        .render(&caption_context)
        .map_err(|error| CaptionError::RenderFailed {
            message: error.to_string(),
        })
}
