//! HTTP-level tests for the summary chain running against a mock
//! OpenAI-compatible endpoint.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use droidpress::repos::{RepositoryInfo, RepositoryPlatform};
use droidpress::{ModelChain, OpenAiConfig, OpenAiProvider, SummaryAgent, SummaryError, SummaryOutput};

const SUMMARY_JSON: &str = r#"{
    "kind": "summary",
    "title": "Bar",
    "description": "A sample Android app for testing.",
    "key_features": ["Fast", "Offline", "Open source"],
    "tags": ["Development"],
    "important_links": []
}"#;

fn repository() -> RepositoryInfo {
    RepositoryInfo {
        platform: RepositoryPlatform::GitHub,
        owner: "foo".to_owned(),
        name: "bar".to_owned(),
        description: Some("An Android sample".to_owned()),
        language: Some("Kotlin".to_owned()),
        stars: 42,
        license: Some("Apache-2.0".to_owned()),
        default_branch: "main".to_owned(),
        web_url: "https://github.com/foo/bar".to_owned(),
        topics: vec!["android".to_owned()],
        readme: Some("# Bar\n\nSee https://example.com/releases".to_owned()),
    }
}

fn agent(server: &MockServer, models: &[&str]) -> SummaryAgent {
    let provider = OpenAiProvider::new(
        reqwest::Client::new(),
        OpenAiConfig::new(server.uri(), Some("sk-test".to_owned())),
    );
    let chain = ModelChain::new(
        models.iter().map(|model| (*model).to_owned()).collect(),
        Duration::from_secs(30),
    );
    SummaryAgent::new(Arc::new(provider), chain)
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "content": content } }]
    })
}

#[tokio::test]
async fn first_model_success_produces_a_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({ "model": "primary" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(SUMMARY_JSON)))
        .expect(1)
        .mount(&server)
        .await;

    let output = agent(&server, &["primary"])
        .summarize(&repository())
        .await
        .expect("summary should succeed");

    let SummaryOutput::Summary(summary) = output else {
        panic!("expected summary variant");
    };
    assert_eq!(summary.title, "Bar");
    assert_eq!(summary.key_features.len(), 3);
}

#[tokio::test]
async fn rate_limited_model_falls_back_to_the_next_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "model": "primary" })))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "model": "fallback" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(SUMMARY_JSON)))
        .expect(1)
        .mount(&server)
        .await;

    let output = agent(&server, &["primary", "fallback"])
        .summarize(&repository())
        .await
        .expect("fallback model should succeed");

    assert!(matches!(output, SummaryOutput::Summary(_)));
}

#[tokio::test]
async fn persistent_server_errors_exhaust_the_chain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(2)
        .mount(&server)
        .await;

    let error = agent(&server, &["primary", "fallback"])
        .summarize(&repository())
        .await
        .expect_err("chain should exhaust");

    let SummaryError::Exhausted {
        attempted,
        last_error,
    } = error
    else {
        panic!("expected exhaustion, got a different error");
    };
    assert_eq!(attempted, ["primary", "fallback"]);
    assert!(last_error.contains("503"));
}

#[tokio::test]
async fn structurally_invalid_payload_fails_without_falling_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(r#"{"kind": "summary", "title": "Bar"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = agent(&server, &["primary", "fallback"])
        .summarize(&repository())
        .await
        .expect_err("invalid payload should fail the call");

    assert!(matches!(
        error,
        SummaryError::InvalidOutput { ref model, .. } if model == "primary"
    ));
}

#[tokio::test]
async fn rejection_payload_is_a_valid_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"kind": "rejected", "reason": "not_android", "explanation": "A CLI tool."}"#,
        )))
        .mount(&server)
        .await;

    let output = agent(&server, &["primary"])
        .summarize(&repository())
        .await
        .expect("rejection should be a successful outcome");

    assert!(matches!(output, SummaryOutput::Rejected(_)));
}
