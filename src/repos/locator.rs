//! Repository URL parsing and identity wrappers.
//!
//! A [`RepositoryLocator`] is the thin boundary between the chat layer and
//! the fetching pipeline: it resolves a pasted URL into a platform plus
//! validated owner/name identifiers, and nothing else.

use std::fmt;

use url::Url;

use super::error::FetchError;

/// Hosting platform a repository lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RepositoryPlatform {
    /// github.com, API v3.
    GitHub,
    /// gitlab.com, API v4.
    GitLab,
}

impl RepositoryPlatform {
    /// Human-readable platform name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::GitLab => "GitLab",
        }
    }

    /// Default public API base for the platform.
    #[must_use]
    pub const fn api_base(self) -> &'static str {
        match self {
            Self::GitHub => "https://api.github.com",
            Self::GitLab => "https://gitlab.com/api/v4",
        }
    }
}

impl fmt::Display for RepositoryPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Repository owner (or namespace path on GitLab) wrapper to avoid stringly
/// typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner segment is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, FetchError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(invalid(value, "owner cannot be empty"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the name segment is non-empty. A trailing `.git` suffix
    /// is stripped.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, FetchError> {
        let trimmed = value.trim().trim_end_matches(".git");
        if trimmed.is_empty() {
            return Err(invalid(value, "repository name cannot be empty"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Parsed repository URL: platform plus validated owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    platform: RepositoryPlatform,
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositoryLocator {
    /// Parses a GitHub or GitLab repository URL.
    ///
    /// Scheme-less input is treated as `https://`. GitLab subgroup paths are
    /// supported: everything before the last segment (up to a literal `-`
    /// separator) becomes the owner path.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] for empty input, non-HTTP schemes,
    /// unsupported hosts, and paths without an `/owner/repo` structure.
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid(input, "value cannot be empty"));
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("https://{trimmed}")
        };

        let parsed = Url::parse(&candidate)
            .map_err(|error| invalid(input, &error.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(input, "unsupported URL scheme, use http or https"));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| invalid(input, "URL must include a host"))?
            .to_ascii_lowercase();

        let platform = detect_platform(&host)
            .ok_or_else(|| invalid(input, "only github.com and gitlab.com URLs are supported"))?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|path| path.filter(|segment| !segment.is_empty()).collect())
            .unwrap_or_default();

        if segments.len() < 2 {
            return Err(invalid(input, "expected an /owner/repo path"));
        }

        let (owner, name) = split_owner_repo(platform, &segments)
            .ok_or_else(|| invalid(input, "unable to determine the project path"))?;

        Ok(Self {
            platform,
            owner: RepositoryOwner::new(&owner)?,
            name: RepositoryName::new(&name)?,
        })
    }

    /// Platform the URL pointed at.
    #[must_use]
    pub const fn platform(&self) -> RepositoryPlatform {
        self.platform
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }
}

fn detect_platform(host: &str) -> Option<RepositoryPlatform> {
    if host == "github.com" || host.ends_with(".github.com") {
        Some(RepositoryPlatform::GitHub)
    } else if host == "gitlab.com" || host.ends_with(".gitlab.com") {
        Some(RepositoryPlatform::GitLab)
    } else {
        None
    }
}

/// Splits path segments into `(owner, name)`.
///
/// GitHub paths are strictly `/owner/repo`; extra segments (tree, blob, pull)
/// are ignored. GitLab paths may nest subgroups, with an optional literal `-`
/// marking the end of the project path.
fn split_owner_repo(
    platform: RepositoryPlatform,
    segments: &[&str],
) -> Option<(String, String)> {
    match platform {
        RepositoryPlatform::GitHub => {
            let mut iter = segments.iter();
            let owner = (*iter.next()?).to_owned();
            let name = (*iter.next()?).to_owned();
            Some((owner, name))
        }
        RepositoryPlatform::GitLab => {
            let project: Vec<&str> = segments
                .iter()
                .take_while(|segment| **segment != "-")
                .copied()
                .collect();
            let (name, owner_segments) = project.split_last()?;
            if owner_segments.is_empty() {
                return None;
            }
            Some((owner_segments.join("/"), (*name).to_owned()))
        }
    }
}

fn invalid(url: &str, reason: &str) -> FetchError {
    FetchError::InvalidUrl {
        url: url.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
