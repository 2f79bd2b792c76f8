//! In-process preview registry with TTL-based expiry.
//!
//! Previews are deliberately non-persistent: a restart clears them, and the
//! sweeper reclaims entries the operator abandoned. All handles share one
//! map, so a preview stored through one clone is visible through any other.

mod entry;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

pub use entry::{PreviewDraft, PreviewEntry};

/// Errors surfaced by the preview registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreviewError {
    /// No entry exists under the given identifier; it either expired or was
    /// never stored.
    #[error("preview {0} not found; it may have expired")]
    NotFound(Uuid),
}

/// Shared in-memory store of pending previews.
#[derive(Debug, Clone)]
pub struct PreviewRegistry {
    entries: Arc<DashMap<Uuid, PreviewEntry>>,
    ttl: Duration,
}

impl PreviewRegistry {
    /// Creates an empty registry whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Stores a draft under a fresh identifier and returns the stored entry.
    #[must_use]
    pub fn store(&self, draft: PreviewDraft) -> PreviewEntry {
        let id = Uuid::new_v4();
        let entry = PreviewEntry::from_draft(id, draft, Utc::now());
        self.entries.insert(id, entry.clone());
        tracing::debug!(preview_id = %id, "stored preview");
        entry
    }

    /// Returns a clone of the entry under `id`, if present.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<PreviewEntry> {
        self.entries.get(&id).map(|entry| entry.clone())
    }

    /// Replaces the content of an existing entry wholesale, preserving its
    /// creation time and bumping the revision count.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::NotFound`] when no entry exists under `id`,
    /// which callers treat as expiry.
    pub fn replace(&self, id: Uuid, draft: PreviewDraft) -> Result<PreviewEntry, PreviewError> {
        let mut entry = self.entries.get_mut(&id).ok_or(PreviewError::NotFound(id))?;
        entry.repository = draft.repository;
        entry.summary = draft.summary;
        entry.caption = draft.caption;
        entry.banner_png = draft.banner_png;
        entry.revision_count += 1;
        Ok(entry.clone())
    }

    /// Removes the entry under `id`. Removing an absent entry is a no-op so
    /// cancellation stays idempotent.
    pub fn delete(&self, id: Uuid) {
        if self.entries.remove(&id).is_some() {
            tracing::debug!(preview_id = %id, "deleted preview");
        }
    }

    /// Drops every entry older than the TTL as of `now`; returns how many
    /// were removed.
    #[must_use]
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        // Removals are counted inside the closure: the map is shared across
        // conversations, so comparing len() before and after would race with
        // concurrent stores.
        let mut swept = 0_usize;
        self.entries.retain(|_, entry| {
            if now - entry.created_at < ttl {
                return true;
            }
            swept += 1;
            false
        });
        if swept > 0 {
            tracing::info!(swept, "expired stale previews");
        }
        swept
    }

    /// Spawns a background task that sweeps expired entries every `period`.
    ///
    /// The task runs until the returned handle is aborted or the runtime
    /// shuts down.
    #[must_use]
    pub fn spawn_sweeper(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let _swept = registry.sweep_expired(Utc::now());
            }
        })
    }

    /// Number of live entries, for observability and tests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use crate::ai::RepositorySummary;
    use crate::repos::{RepositoryInfo, RepositoryPlatform};

    use super::{PreviewDraft, PreviewError, PreviewRegistry};

    fn draft(title: &str) -> PreviewDraft {
        PreviewDraft {
            repository: RepositoryInfo {
                platform: RepositoryPlatform::GitHub,
                owner: "foo".to_owned(),
                name: "bar".to_owned(),
                description: None,
                language: None,
                stars: 0,
                license: None,
                default_branch: "main".to_owned(),
                web_url: "https://github.com/foo/bar".to_owned(),
                topics: Vec::new(),
                readme: None,
            },
            summary: RepositorySummary {
                title: title.to_owned(),
                description: "An app.".to_owned(),
                key_features: vec!["Does things".to_owned()],
                tags: Vec::new(),
                important_links: Vec::new(),
            },
            caption: format!("<b>{title}</b>"),
            banner_png: vec![1, 2, 3],
        }
    }

    #[test]
    fn store_then_get_round_trips_the_draft() {
        let registry = PreviewRegistry::new(Duration::from_secs(60));
        let stored = registry.store(draft("Bar"));

        let entry = registry.get(stored.id).expect("entry should be present");
        assert_eq!(entry, stored);
        assert_eq!(entry.summary.title, "Bar");
        assert_eq!(entry.revision_count, 0);
    }

    #[test]
    fn replace_preserves_identity_and_bumps_revision_count() {
        let registry = PreviewRegistry::new(Duration::from_secs(60));
        let stored = registry.store(draft("Bar"));

        let replaced = registry
            .replace(stored.id, draft("Bar v2"))
            .expect("replace should succeed");

        assert_eq!(replaced.id, stored.id);
        assert_eq!(replaced.summary.title, "Bar v2");
        assert_eq!(replaced.revision_count, 1);
        assert_eq!(replaced.created_at, stored.created_at);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn replace_after_delete_reports_not_found() {
        let registry = PreviewRegistry::new(Duration::from_secs(60));
        let stored = registry.store(draft("Bar"));
        registry.delete(stored.id);

        let error = registry
            .replace(stored.id, draft("Bar v2"))
            .expect_err("replace should fail once deleted");
        assert_eq!(error, PreviewError::NotFound(stored.id));
    }

    #[test]
    fn delete_is_idempotent() {
        let registry = PreviewRegistry::new(Duration::from_secs(60));
        let stored = registry.store(draft("Bar"));

        registry.delete(stored.id);
        registry.delete(stored.id);
        assert!(registry.is_empty());
    }

    #[test]
    fn sweep_removes_only_entries_past_the_ttl() {
        let registry = PreviewRegistry::new(Duration::from_secs(60));
        let stale = registry.store(draft("Old"));
        let fresh = registry.store(draft("New"));

        let later = Utc::now() + chrono::Duration::seconds(61);
        if let Some(mut entry) = registry.entries.get_mut(&fresh.id) {
            entry.created_at = later - chrono::Duration::seconds(5);
        }

        assert_eq!(registry.sweep_expired(later), 1);
        assert!(registry.get(stale.id).is_none());
        assert!(registry.get(fresh.id).is_some());
    }

    #[test]
    fn sweep_tolerates_concurrent_stores() {
        let registry = PreviewRegistry::new(Duration::from_secs(60));
        let writer = registry.clone();
        let handle = std::thread::spawn(move || {
            for _ in 0..2_000 {
                let entry = writer.store(draft("Spin"));
                writer.delete(entry.id);
            }
        });

        // Every entry is younger than the TTL, so sweeps must remove
        // nothing and must not panic while the writer churns the map.
        let now = Utc::now();
        while !handle.is_finished() {
            assert_eq!(registry.sweep_expired(now), 0);
        }
        handle.join().expect("writer thread should finish");
    }
}
