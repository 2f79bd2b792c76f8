//! Preview draft and stored entry types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ai::RepositorySummary;
use crate::repos::RepositoryInfo;

/// Everything needed to render a preview, before it has an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDraft {
    /// Snapshot of the fetched repository.
    pub repository: RepositoryInfo,
    /// The generated summary being previewed.
    pub summary: RepositorySummary,
    /// Rendered post caption, ready for publication.
    pub caption: String,
    /// Rendered banner image, PNG bytes.
    pub banner_png: Vec<u8>,
}

/// A stored preview with its registry identity and bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    /// Registry identifier.
    pub id: Uuid,
    /// Snapshot of the fetched repository.
    pub repository: RepositoryInfo,
    /// The summary currently on display.
    pub summary: RepositorySummary,
    /// Rendered post caption, ready for publication.
    pub caption: String,
    /// Rendered banner image, PNG bytes.
    pub banner_png: Vec<u8>,
    /// How many revisions have replaced the original draft.
    pub revision_count: u32,
    /// When the entry was first stored; revisions do not reset this.
    pub created_at: DateTime<Utc>,
}

impl PreviewEntry {
    pub(super) fn from_draft(id: Uuid, draft: PreviewDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            repository: draft.repository,
            summary: draft.summary,
            caption: draft.caption,
            banner_png: draft.banner_png,
            revision_count: 0,
            created_at,
        }
    }
}
