//! Integration tests for the crawler
//!
//! These tests use wiremock as the platform's item API and run full
//! traversals end-to-end. Crawled URLs stay on `qiita.com`; only the API base
//! points at the mock server.

use std::time::{Duration, Instant};
use weblink_tree::config::Config;
use weblink_tree::crawler::crawl;
use weblink_tree::{LinkNode, WeblinkError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing the item API at the mock server
fn create_test_config(api_base: &str) -> Config {
    let mut config = Config::default();
    config.crawler.request_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.platform.api_base = api_base.to_string();
    config
}

/// Builds an item API body whose rendered HTML contains the given anchors
fn item_body(anchors: &[(&str, &str)]) -> serde_json::Value {
    let html: String = anchors
        .iter()
        .map(|(text, href)| format!(r#"<p><a href="{}">{}</a></p>"#, href, text))
        .collect();
    serde_json::json!({ "id": "ignored", "rendered_body": html })
}

/// Mounts an item that must be fetched exactly once
async fn mount_item(server: &MockServer, item_id: &str, anchors: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/items/{}", item_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_body(anchors)))
        .expect(1)
        .mount(server)
        .await;
}

fn children(node: &LinkNode) -> &[LinkNode] {
    node.children.as_deref().expect("node was not expanded")
}

fn child_urls(node: &LinkNode) -> Vec<&str> {
    children(node).iter().map(|c| c.url.as_str()).collect()
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_seed_with_asset_proxy_link() {
    let server = MockServer::start().await;
    mount_item(
        &server,
        "abc123",
        &[
            ("B", "https://qiita.com/bob/items/def456"),
            ("img", "https://camo.qiitausercontent.com/x"),
        ],
    )
    .await;
    mount_item(&server, "def456", &[]).await;

    let config = create_test_config(&server.uri());
    let outcome = crawl(&config, "https://qiita.com/alice/items/abc123?ref=x#top", None)
        .await
        .expect("Crawl failed");

    let root = &outcome.tree;
    assert_eq!(root.url.as_str(), "https://qiita.com/alice/items/abc123");
    assert_eq!(root.text, "https://qiita.com/alice/items/abc123");
    assert_eq!(child_urls(root), vec!["https://qiita.com/bob/items/def456"]);

    let child = &children(root)[0];
    assert_eq!(child.text, "B");
    assert!(child.is_leaf());
}

#[tokio::test]
async fn test_each_url_fetched_at_most_once() {
    let server = MockServer::start().await;
    // a links to b and to itself, b links back to a
    mount_item(
        &server,
        "a",
        &[
            ("to b", "https://qiita.com/u/items/b"),
            ("self", "https://qiita.com/u/items/a?from=self"),
        ],
    )
    .await;
    mount_item(&server, "b", &[("back", "https://qiita.com/u/items/a#top")]).await;

    let config = create_test_config(&server.uri());
    let outcome = crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.stats.expanded, 2);
    assert_eq!(outcome.stats.fetched, 2);
    assert_eq!(outcome.stats.duplicates_skipped, 2);

    let root = &outcome.tree;
    let b = &children(root)[0];
    let self_link = &children(root)[1];
    assert_eq!(self_link.url.as_str(), "https://qiita.com/u/items/a");
    assert_eq!(self_link.children, None);
    assert_eq!(children(b)[0].children, None);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;
    mount_item(
        &server,
        "a",
        &[
            ("b", "https://qiita.com/u/items/b"),
            ("c", "https://qiita.com/u/items/c"),
        ],
    )
    .await;
    mount_item(&server, "b", &[("d", "https://qiita.com/u/items/d")]).await;
    mount_item(&server, "c", &[("e", "https://qiita.com/u/items/e")]).await;
    mount_item(&server, "d", &[]).await;
    mount_item(&server, "e", &[]).await;

    let config = create_test_config(&server.uri());
    crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    assert_eq!(
        requested_paths(&server).await,
        vec![
            "/api/v2/items/a",
            "/api/v2/items/b",
            "/api/v2/items/c",
            "/api/v2/items/d",
            "/api/v2/items/e",
        ]
    );
}

#[tokio::test]
async fn test_concurrent_crawl_builds_same_tree() {
    let server = MockServer::start().await;
    // Diamond with a shared grandchild: b and c both link to d
    for (item, anchors) in [
        (
            "a",
            vec![
                ("b", "https://qiita.com/u/items/b"),
                ("c", "https://qiita.com/u/items/c"),
                ("x", "https://example.com/x"),
            ],
        ),
        ("b", vec![("d", "https://qiita.com/u/items/d")]),
        (
            "c",
            vec![
                ("d", "https://qiita.com/u/items/d"),
                ("a", "https://qiita.com/u/items/a"),
            ],
        ),
        ("d", vec![("u", "https://qiita.com/u")]),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/api/v2/items/{}", item)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(item_body(&anchors))
                    .set_delay(Duration::from_millis(if item == "b" { 80 } else { 5 })),
            )
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&server.uri());
    let sequential = crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    config.crawler.max_concurrent_fetches = 4;
    let concurrent = crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    assert_eq!(sequential.tree, concurrent.tree);
    assert_eq!(sequential.stats, concurrent.stats);

    // d is expanded under b (discovered first), and left unexpanded under c
    let b = &children(&sequential.tree)[0];
    let c = &children(&sequential.tree)[1];
    assert!(children(b)[0].children.is_some());
    assert_eq!(children(c)[0].children, None);
}

#[tokio::test]
async fn test_off_platform_seed_is_leaf_without_fetch() {
    let server = MockServer::start().await;

    let config = create_test_config(&server.uri());
    let outcome = crawl(&config, "https://example.com/alice/items/abc123", None)
        .await
        .expect("Crawl failed");

    assert!(outcome.tree.is_leaf());
    assert_eq!(outcome.stats.non_target, 1);
    assert!(requested_paths(&server).await.is_empty());
}

#[tokio::test]
async fn test_non_item_path_seed_is_leaf_without_fetch() {
    let server = MockServer::start().await;

    let config = create_test_config(&server.uri());
    let outcome = crawl(&config, "https://qiita.com/alice/posts/abc123", None)
        .await
        .expect("Crawl failed");

    assert!(outcome.tree.is_leaf());
    assert_eq!(outcome.stats.non_item, 1);
    assert!(requested_paths(&server).await.is_empty());
}

#[tokio::test]
async fn test_unavailable_item_degrades_to_leaf() {
    let server = MockServer::start().await;
    mount_item(
        &server,
        "a",
        &[
            ("limited", "https://qiita.com/u/items/limited"),
            ("ok", "https://qiita.com/u/items/ok"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/items/limited"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("rate-remaining", "0")
                .insert_header("rate-limit", "60")
                .insert_header("rate-reset", "1700000000"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_item(&server, "ok", &[("next", "https://qiita.com/u/items/gone")]).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/items/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let outcome = crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    let limited = &children(&outcome.tree)[0];
    let ok = &children(&outcome.tree)[1];
    assert!(limited.is_leaf());
    assert_eq!(child_urls(ok), vec!["https://qiita.com/u/items/gone"]);
    assert!(children(ok)[0].is_leaf());
    assert_eq!(outcome.stats.unavailable, 2);
    assert_eq!(outcome.stats.fetched, 2);
}

#[tokio::test]
async fn test_invalid_item_body_degrades_to_leaf() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/items/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let outcome = crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    assert!(outcome.tree.is_leaf());
    assert_eq!(outcome.stats.unavailable, 1);
}

#[tokio::test]
async fn test_timeout_degrades_to_leaf() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/items/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(item_body(&[]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.crawler.request_timeout_secs = 1;
    let outcome = crawl(&config, "https://qiita.com/u/items/slow", None)
        .await
        .expect("Crawl failed");

    assert!(outcome.tree.is_leaf());
    assert_eq!(outcome.stats.unavailable, 1);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/items/a"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_body(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let outcome = crawl(
        &config,
        "https://qiita.com/u/items/a",
        Some("secret-token".to_string()),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(outcome.stats.fetched, 1);
}

#[tokio::test]
async fn test_filtered_links_never_become_children() {
    let server = MockServer::start().await;
    mount_item(
        &server,
        "a",
        &[
            ("file", "https://qiita.com/files/abc.png"),
            ("img", "https://camo.qiitausercontent.com/abc"),
            ("rel", "/relative"),
            ("mail", "mailto:someone@example.com"),
            ("ext", "https://example.com/page?q=1"),
        ],
    )
    .await;

    let config = create_test_config(&server.uri());
    let outcome = crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    assert_eq!(child_urls(&outcome.tree), vec!["https://example.com/page"]);
    assert!(children(&outcome.tree)[0].is_leaf());
}

#[tokio::test]
async fn test_page_cap_stops_expansion() {
    let server = MockServer::start().await;
    mount_item(
        &server,
        "a",
        &[
            ("b", "https://qiita.com/u/items/b"),
            ("c", "https://qiita.com/u/items/c"),
        ],
    )
    .await;
    mount_item(&server, "b", &[]).await;

    let mut config = create_test_config(&server.uri());
    config.crawler.max_pages = Some(2);
    let outcome = crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    let c = &children(&outcome.tree)[1];
    assert_eq!(c.children, None);
    assert_eq!(outcome.stats.expanded, 2);
    assert_eq!(outcome.stats.left_in_queue, 1);
}

#[tokio::test]
async fn test_requests_are_paced() {
    let server = MockServer::start().await;
    mount_item(
        &server,
        "a",
        &[
            ("b", "https://qiita.com/u/items/b"),
            ("c", "https://qiita.com/u/items/c"),
        ],
    )
    .await;
    mount_item(&server, "b", &[]).await;
    mount_item(&server, "c", &[]).await;

    let mut config = create_test_config(&server.uri());
    config.crawler.request_delay_ms = 100;
    config.crawler.max_concurrent_fetches = 3;

    let start = Instant::now();
    crawl(&config, "https://qiita.com/u/items/a", None)
        .await
        .expect("Crawl failed");

    // Three requests need at least two intervals, even with three workers
    assert!(start.elapsed() >= Duration::from_millis(180));
}

#[tokio::test]
async fn test_malformed_seed_is_fatal() {
    let config = create_test_config("http://127.0.0.1:9");

    let relative = crawl(&config, "/alice/items/abc123", None).await;
    assert!(matches!(relative, Err(WeblinkError::Seed(_))));

    let not_http = crawl(&config, "ftp://qiita.com/alice/items/abc123", None).await;
    assert!(matches!(not_http, Err(WeblinkError::Seed(_))));
}
