//! Integration tests for the adapters and the fan-out pipeline.
//!
//! Every upstream is a local wiremock server, so these run without network
//! access.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use unified_search::adapters::knowledge_base::biased_query;
use unified_search::adapters::{DocsAdapter, KnowledgeBaseAdapter, ZendeskAdapter};
use unified_search::{
    DocsConfig, SearchError, Source, SourceAdapter, SourceRegistry, SourcesConfig, ZendeskConfig,
};
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLES_PATH: &str = "/api/v2/help_center/articles/search.json";

fn config_for(server: &MockServer) -> SourcesConfig {
    SourcesConfig {
        zendesk: ZendeskConfig {
            subdomain: None,
            base_url: Some(format!("{}/api/v2", server.uri())),
            email: Some("agent@acme.test".into()),
            api_token: Some("tok123".into()),
        },
        docs: DocsConfig {
            base_url: Some(server.uri()),
        },
        timeout_seconds: 1,
    }
}

fn articles(ids: &[u64], title: &str) -> Value {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "title": format!("{title} {id}"),
                "html_url": format!("https://acme.zendesk.com/hc/en-us/articles/{id}"),
                "body": "<p>Open <b>Settings</b> &amp; choose reset.</p>",
                "score": 4.0,
                "section_id": 77,
                "updated_at": "2020-01-01T00:00:00Z",
                "created_at": "2019-01-01T00:00:00Z",
                "locale": "en-us"
            })
        })
        .collect();
    json!({ "results": results })
}

fn docs_index() -> Value {
    json!([{
        "documents": [
            {"t": "Password Reset Guide", "u": "/guides/password-reset", "b": ["Guides", "Account"], "i": 1},
            {"t": "Billing overview", "u": "/billing", "b": ["Billing"], "i": 2},
            {"t": "Reset your password from the app", "u": "/app/reset", "b": ["Mobile"], "i": 3},
            {"t": "", "u": "/empty", "b": [], "i": 4}
        ]
    }])
}

// ────────────────────────────────────────────────────────────────────────────
// Adapter request format
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn zendesk_adapter_sends_query_locale_page_size_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .and(query_param("query", "password reset"))
        .and(query_param("locale", "en-us"))
        .and(query_param("per_page", "4"))
        .and(basic_auth("agent@acme.test/token", "tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(&[11, 12], "Reset")))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = ZendeskAdapter::new(&config_for(&server)).unwrap();
    let results = adapter.fetch("  password reset ", 4).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "zendesk_11");
    assert_eq!(results[0].source, Source::Zendesk);
    assert_eq!(results[0].snippet, "Open Settings & choose reset.");
    assert_eq!(results[0].category.as_deref(), Some("Section 77"));
    assert!((results[0].score - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn knowledge_base_adapter_biases_query_and_discounts_scores() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .and(query_param("query", biased_query("login loop").as_str()))
        .and(query_param("per_page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(&[5], "Login")))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = KnowledgeBaseAdapter::new(&config_for(&server)).unwrap();
    let results = adapter.fetch("login loop", 3).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "kb_5");
    assert_eq!(results[0].source, Source::KnowledgeBase);
    assert_eq!(results[0].category.as_deref(), Some("Knowledge Base"));
    assert!((results[0].score - 3.2).abs() < 1e-9);
}

#[tokio::test]
async fn docs_adapter_scores_index_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search-index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(docs_index()))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = DocsAdapter::new(&config_for(&server)).unwrap();
    let results = adapter.fetch("password reset", 5).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "docs_1");
    // (100 + 20 + 20) * 0.9
    assert!((results[0].score - 126.0).abs() < 1e-9);
    assert_eq!(
        results[0].url,
        format!("{}/guides/password-reset", server.uri())
    );
    assert_eq!(results[0].section.as_deref(), Some("Account"));
    assert_eq!(results[1].id, "docs_3");
}

// ────────────────────────────────────────────────────────────────────────────
// Adapter failure handling
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_success_status_is_an_http_error_and_absorbed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let adapter = ZendeskAdapter::new(&config_for(&server)).unwrap();
    let err = adapter.fetch("password", 2).await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)), "got {err:?}");
    assert!(adapter.search("password", 2).await.is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_absorbed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"articles": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search-index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let zendesk = ZendeskAdapter::new(&config).unwrap();
    let docs = DocsAdapter::new(&config).unwrap();

    assert!(zendesk.fetch("password", 2).await.is_err());
    assert!(matches!(
        docs.fetch("password", 2).await.unwrap_err(),
        SearchError::Parse(_)
    ));
    assert!(zendesk.search("password", 2).await.is_empty());
    assert!(docs.search("password", 2).await.is_empty());
}

#[tokio::test]
async fn slow_source_times_out_without_holding_back_others() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .and(query_param("query", "password reset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(&[1], "Password reset")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search-index.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(docs_index())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let docs = DocsAdapter::new(&config).unwrap();
    assert!(matches!(
        docs.fetch("password reset", 3).await.unwrap_err(),
        SearchError::Timeout(_)
    ));

    let registry = Arc::new(SourceRegistry::from_config(&config).unwrap());
    let outcome = unified_search::search(
        &registry,
        "password reset",
        10,
        &[Source::Zendesk, Source::Docs],
    )
    .await;

    assert_eq!(outcome.total, 1);
    assert_eq!(outcome.results[0].id, "zendesk_1");
}

// ────────────────────────────────────────────────────────────────────────────
// Fan-out pipeline
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn single_source_request_only_calls_that_source_with_its_share() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .and(query_param("query", "password reset"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(&[1, 2], "Password reset")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search-index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(docs_index()))
        .expect(0)
        .mount(&server)
        .await;

    let registry = Arc::new(SourceRegistry::from_config(&config_for(&server)).unwrap());
    let outcome = unified_search::search(&registry, "password reset", 5, &[Source::Zendesk]).await;

    assert!(outcome.results.len() <= 5);
    assert_eq!(outcome.total, 2);
    assert!(outcome.results.iter().all(|r| r.source == Source::Zendesk));
    server.verify().await;
}

#[tokio::test]
async fn failing_source_leaves_other_results_ranked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .and(query_param("query", "password reset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(&[1, 2, 3], "Password reset")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .and(query_param("query", biased_query("password reset").as_str()))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search-index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(docs_index()))
        .mount(&server)
        .await;

    let registry = Arc::new(SourceRegistry::from_config(&config_for(&server)).unwrap());
    let outcome = unified_search::search(&registry, "password reset", 10, Source::all()).await;

    // Zendesk share of 10 is 4 (3 returned), docs share is 3 (2 match).
    assert_eq!(outcome.total, 5);
    assert_eq!(outcome.results.len(), 5);
    assert!(outcome
        .results
        .iter()
        .all(|r| r.source != Source::KnowledgeBase));
    for pair in outcome.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    // docs_1: 126 + 20 + 20 + 30 + 6 outranks every help-center article.
    assert_eq!(outcome.results[0].id, "docs_1");
}

#[tokio::test]
async fn results_are_truncated_to_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(&[1, 2, 3, 4], "Password reset")))
        .mount(&server)
        .await;

    let registry = Arc::new(SourceRegistry::from_config(&config_for(&server)).unwrap());
    let outcome = unified_search::search(
        &registry,
        "password reset",
        3,
        &[Source::Zendesk, Source::KnowledgeBase],
    )
    .await;

    // Both help-center flavours answer with the same four articles.
    assert_eq!(outcome.total, 8);
    assert_eq!(outcome.results.len(), 3);
    assert!(outcome.results.iter().all(|r| r.source == Source::Zendesk));
}
