//! Scenario tests for the post workflow state machine.

use std::sync::Arc;
use std::time::Duration;

use crate::ai::{
    MockChatCompletionProvider, ModelChain, ProviderError, RevisionAgent, SummaryAgent,
};
use crate::preview::PreviewRegistry;
use crate::repos::{FetchError, MockRepositoryFetcher, RepositoryInfo, RepositoryPlatform};

use super::{
    CancelOutcome, CommandOutcome, ConversationState, MessageRef, MockBannerRenderer,
    MockChannelPublisher, PipelineDeps, PostWorkflow, PublishError, PublishOutcome, ReviseOutcome,
};

const SUMMARY_JSON: &str = r#"{
    "kind": "summary",
    "title": "Bar",
    "description": "A sample Android app.",
    "key_features": ["Fast", "Offline"],
    "tags": ["Development"],
    "important_links": []
}"#;

const REVISED_JSON: &str = r#"{
    "kind": "summary",
    "title": "Bar Reloaded",
    "description": "A sample Android app, now shinier.",
    "key_features": ["Fast", "Offline", "Shiny"],
    "tags": ["Development"],
    "important_links": []
}"#;

const REJECTED_JSON: &str = r#"{
    "kind": "rejected",
    "reason": "not_android",
    "explanation": "This is a desktop tool."
}"#;

fn repository() -> RepositoryInfo {
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
        topics: Vec::new(),
        readme: None,
    }
}

fn chain() -> ModelChain {
    ModelChain::new(vec!["primary".to_owned()], Duration::from_secs(30))
}

/// Builder collecting configured mocks into a [`PipelineDeps`].
struct DepsBuilder {
    github: MockRepositoryFetcher,
    summary_provider: MockChatCompletionProvider,
    revision_provider: MockChatCompletionProvider,
    banner: MockBannerRenderer,
    publisher: MockChannelPublisher,
    registry: PreviewRegistry,
}

impl DepsBuilder {
    fn new() -> Self {
        Self {
            github: MockRepositoryFetcher::new(),
            summary_provider: MockChatCompletionProvider::new(),
            revision_provider: MockChatCompletionProvider::new(),
            banner: MockBannerRenderer::new(),
            publisher: MockChannelPublisher::new(),
            registry: PreviewRegistry::new(Duration::from_secs(1800)),
        }
    }

    fn fetch_succeeds(mut self) -> Self {
        self.github
            .expect_fetch_repository()
            .returning(|_, _| Ok(repository()));
        self
    }

    fn summary_responds(mut self, payload: &'static str) -> Self {
        self.summary_provider
            .expect_complete()
            .returning(move |_, _| Ok(payload.to_owned()));
        self
    }

    fn revision_responds(mut self, payload: &'static str) -> Self {
        self.revision_provider
            .expect_complete()
            .returning(move |_, _| Ok(payload.to_owned()));
        self
    }

    fn banner_renders(mut self) -> Self {
        self.banner.expect_render().returning(|_, _| Ok(vec![0x89]));
        self
    }

    fn build(self) -> Arc<PipelineDeps> {
        Arc::new(PipelineDeps {
            github: Arc::new(self.github),
            gitlab: Arc::new(MockRepositoryFetcher::new()),
            summary_agent: SummaryAgent::new(Arc::new(self.summary_provider), chain()),
            revision_agent: RevisionAgent::new(Arc::new(self.revision_provider), chain()),
            registry: self.registry,
            banner: Arc::new(self.banner),
            publisher: Arc::new(self.publisher),
        })
    }
}

#[tokio::test]
async fn command_creates_a_preview_on_the_happy_path() {
    let deps = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(SUMMARY_JSON)
        .banner_renders()
        .build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let outcome = workflow.command("https://github.com/foo/bar").await;

    let CommandOutcome::PreviewCreated(entry) = outcome else {
        panic!("expected a preview, got {outcome:?}");
    };
    assert_eq!(entry.summary.title, "Bar");
    assert!(entry.caption.contains("<b>Bar</b>"));
    assert_eq!(deps.registry.len(), 1);
    assert_eq!(
        workflow.state(),
        ConversationState::PreviewReady {
            preview_id: entry.id
        }
    );
}

#[tokio::test]
async fn command_reports_rejection_and_stores_nothing() {
    let deps = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(REJECTED_JSON)
        .build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let outcome = workflow.command("https://github.com/foo/bar").await;

    assert!(
        matches!(outcome, CommandOutcome::Rejected(ref rejection)
            if rejection.explanation.contains("desktop")),
        "expected rejection, got {outcome:?}"
    );
    assert!(deps.registry.is_empty());
    assert_eq!(workflow.state(), ConversationState::Idle);
}

#[tokio::test]
async fn command_surfaces_fetch_failures_without_poisoning_the_conversation() {
    let mut builder = DepsBuilder::new();
    builder
        .github
        .expect_fetch_repository()
        .returning(|owner, name| {
            Err(FetchError::NotFound {
                platform: RepositoryPlatform::GitHub,
                owner: owner.as_str().to_owned(),
                name: name.as_str().to_owned(),
            })
        });
    let deps = builder.build();
    let mut workflow = PostWorkflow::new(deps);

    let outcome = workflow.command("https://github.com/foo/missing").await;

    assert!(
        matches!(outcome, CommandOutcome::Failed { ref message } if message.contains("not found")),
        "expected failure, got {outcome:?}"
    );
    assert_eq!(workflow.state(), ConversationState::Idle);
}

#[tokio::test]
async fn command_rejects_invalid_urls_before_any_network_call() {
    let deps = DepsBuilder::new().build();
    let mut workflow = PostWorkflow::new(deps);

    let outcome = workflow.command("https://bitbucket.org/foo/bar").await;

    assert!(matches!(outcome, CommandOutcome::Failed { .. }));
    assert_eq!(workflow.state(), ConversationState::Idle);
}

#[tokio::test]
async fn new_command_discards_the_pending_preview() {
    let deps = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(SUMMARY_JSON)
        .banner_renders()
        .build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let CommandOutcome::PreviewCreated(first) =
        workflow.command("https://github.com/foo/bar").await
    else {
        panic!("first command should create a preview");
    };
    let CommandOutcome::PreviewCreated(second) =
        workflow.command("https://github.com/foo/bar").await
    else {
        panic!("second command should create a preview");
    };

    assert_ne!(first.id, second.id);
    assert_eq!(deps.registry.len(), 1);
    assert!(deps.registry.get(first.id).is_none());
}

#[tokio::test]
async fn revise_replaces_the_preview_wholesale() {
    let deps = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(SUMMARY_JSON)
        .revision_responds(REVISED_JSON)
        .banner_renders()
        .build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let CommandOutcome::PreviewCreated(original) =
        workflow.command("https://github.com/foo/bar").await
    else {
        panic!("command should create a preview");
    };

    let outcome = workflow.revise("mention it is shinier").await;

    let ReviseOutcome::Revised(revised) = outcome else {
        panic!("expected a revision, got {outcome:?}");
    };
    assert_eq!(revised.id, original.id);
    assert_eq!(revised.summary.title, "Bar Reloaded");
    assert_eq!(revised.revision_count, 1);
    assert_eq!(revised.created_at, original.created_at);
    assert!(revised.caption.contains("Bar Reloaded"));
}

#[tokio::test]
async fn failed_revision_keeps_the_prior_preview_publishable() {
    let mut builder = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(SUMMARY_JSON)
        .banner_renders();
    builder.revision_provider.expect_complete().returning(|_, _| {
        Err(ProviderError::Request {
            message: "invalid API key".to_owned(),
        })
    });
    let deps = builder.build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let CommandOutcome::PreviewCreated(original) =
        workflow.command("https://github.com/foo/bar").await
    else {
        panic!("command should create a preview");
    };

    let outcome = workflow.revise("make it shinier").await;

    assert!(matches!(outcome, ReviseOutcome::Failed { .. }));
    let kept = deps
        .registry
        .get(original.id)
        .expect("prior preview should survive a failed revision");
    assert_eq!(kept.summary.title, "Bar");
    assert_eq!(kept.revision_count, 0);
    assert_eq!(
        workflow.state(),
        ConversationState::PreviewReady {
            preview_id: original.id
        }
    );
}

#[tokio::test]
async fn revise_on_an_expired_preview_reports_expiry() {
    let deps = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(SUMMARY_JSON)
        .banner_renders()
        .build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let CommandOutcome::PreviewCreated(entry) =
        workflow.command("https://github.com/foo/bar").await
    else {
        panic!("command should create a preview");
    };
    deps.registry.delete(entry.id);

    assert_eq!(workflow.revise("tweak it").await, ReviseOutcome::Expired);
    assert_eq!(workflow.state(), ConversationState::Idle);
}

#[tokio::test]
async fn revise_without_a_preview_is_refused() {
    let deps = DepsBuilder::new().build();
    let mut workflow = PostWorkflow::new(deps);

    assert_eq!(
        workflow.revise("tweak it").await,
        ReviseOutcome::NoActivePreview
    );
}

#[tokio::test]
async fn publish_releases_the_preview_and_finishes_the_conversation() {
    let mut builder = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(SUMMARY_JSON)
        .banner_renders();
    builder.publisher.expect_publish().returning(|_, _| {
        Ok(MessageRef {
            chat_id: -100,
            message_id: 7,
        })
    });
    let deps = builder.build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let CommandOutcome::PreviewCreated(_) = workflow.command("https://github.com/foo/bar").await
    else {
        panic!("command should create a preview");
    };

    let outcome = workflow.publish().await;

    assert!(matches!(
        outcome,
        PublishOutcome::Published(MessageRef {
            chat_id: -100,
            message_id: 7
        })
    ));
    assert!(deps.registry.is_empty());
    assert_eq!(workflow.state(), ConversationState::Published);
}

#[tokio::test]
async fn failed_publish_leaves_the_preview_for_a_retry() {
    let mut builder = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(SUMMARY_JSON)
        .banner_renders();
    builder.publisher.expect_publish().returning(|_, _| {
        Err(PublishError::Channel("flood control".to_owned()))
    });
    let deps = builder.build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let CommandOutcome::PreviewCreated(entry) =
        workflow.command("https://github.com/foo/bar").await
    else {
        panic!("command should create a preview");
    };

    let outcome = workflow.publish().await;

    assert!(
        matches!(outcome, PublishOutcome::Failed { ref message } if message.contains("flood")),
        "expected failure, got {outcome:?}"
    );
    assert!(deps.registry.get(entry.id).is_some());
    assert_eq!(
        workflow.state(),
        ConversationState::PreviewReady {
            preview_id: entry.id
        }
    );
}

#[tokio::test]
async fn cancel_discards_the_preview_and_is_idempotent() {
    let deps = DepsBuilder::new()
        .fetch_succeeds()
        .summary_responds(SUMMARY_JSON)
        .banner_renders()
        .build();
    let mut workflow = PostWorkflow::new(Arc::clone(&deps));

    let CommandOutcome::PreviewCreated(_) = workflow.command("https://github.com/foo/bar").await
    else {
        panic!("command should create a preview");
    };

    assert_eq!(workflow.cancel(), CancelOutcome::Cancelled);
    assert!(deps.registry.is_empty());
    assert_eq!(workflow.state(), ConversationState::Idle);
    assert_eq!(workflow.cancel(), CancelOutcome::NothingPending);
    assert_eq!(workflow.state(), ConversationState::Idle);
}
