//! Integration tests for day selection against live HTTP endpoints.

mod common;

use std::time::Duration;

use common::{
    entry_body, http_client, image_names, png_payload, raw_query, ENTRY_PATH, PROXY_PATH,
};
use threadpeek::cli::preview_day;
use threadpeek::config::PeekConfig;
use threadpeek::entry::EntryClient;
use threadpeek::error::PeekError;
use threadpeek::resolver::ImageResolver;
use threadpeek::session::{PreviewSession, SessionState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session(server: &MockServer) -> PreviewSession {
    let client = http_client();
    PreviewSession::new(
        EntryClient::new(std::sync::Arc::clone(&client), format!("{}{}", server.uri(), ENTRY_PATH)),
        ImageResolver::new(client, format!("{}{}", server.uri(), PROXY_PATH)),
    )
}

async fn mount_entry(server: &MockServer, day: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(ENTRY_PATH))
        .and(raw_query(day))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_five_images_compose_into_three_posts() {
    let server = MockServer::start().await;
    let names = image_names(5);
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    mount_entry(&server, "8", entry_body(&refs, "That's all")).await;
    Mock::given(method("GET"))
        .and(path(PROXY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(png_payload(4, 3)))
        .mount(&server)
        .await;

    let mut session = session(&server);
    let thread = session.select_day(8).await.thread_mut().expect("loaded");

    let sizes: Vec<usize> = thread.units.iter().map(|u| u.images.len()).collect();
    assert_eq!(sizes, vec![4, 1, 0]);
    assert_eq!(thread.units[2].text, "That's all");

    let states = thread.settle_all().await;
    assert_eq!(states.len(), 5);
    assert!(states.iter().all(|s| s.content().and_then(|c| c.dimensions()) == Some((4, 3))));
}

#[tokio::test]
async fn test_switching_days_replaces_thread() {
    let server = MockServer::start().await;
    mount_entry(&server, "1", entry_body(&["slow"], "one")).await;
    mount_entry(&server, "2", entry_body(&[], "two")).await;
    Mock::given(method("GET"))
        .and(path(PROXY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(png_payload(1, 1))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let mut session = session(&server);
    let first = session.select_day(1).await.thread().expect("loaded");
    let observer = first.slots[0].subscribe();

    let second = session.select_day(2).await.thread().expect("loaded");
    assert_eq!(second.day, 2);
    assert!(second.slots.is_empty());
    assert_eq!(second.units.len(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(observer.borrow().is_pending());
}

#[tokio::test]
async fn test_entry_failure_replaces_preview() {
    let server = MockServer::start().await;
    mount_entry(&server, "3", entry_body(&[], "ok")).await;
    Mock::given(method("GET"))
        .and(path(ENTRY_PATH))
        .and(raw_query("4"))
        .respond_with(ResponseTemplate::new(503).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.select_day(3).await;
    let state = session.select_day(4).await;

    assert!(matches!(state, SessionState::Failed { day: 4, .. }));
    assert_eq!(
        state.error().map(ToString::to_string).as_deref(),
        Some("Entry service returned HTTP 503: quota exceeded")
    );
}

#[tokio::test]
async fn test_preview_command_end_to_end() {
    let server = MockServer::start().await;
    mount_entry(
        &server,
        "21",
        serde_json::json!({
            "entry": {
                "images": ["ok", "broken"],
                "trailingText": "Fin",
                "meta": {"title": "Solstice"}
            }
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(PROXY_PATH))
        .and(raw_query("ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(png_payload(6, 4)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PROXY_PATH))
        .and(raw_query("broken"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let config = PeekConfig::new()
        .with_entry_api_base(format!("{}{}", server.uri(), ENTRY_PATH))
        .with_image_proxy_base(format!("{}{}", server.uri(), PROXY_PATH));

    let out = preview_day(21, &config, http_client()).await.unwrap();

    assert!(out.starts_with("DAY 21 · Solstice\n"));
    assert!(out.contains("✓ image/png 6x4"));
    assert!(out.contains("✗ failed: image proxy returned HTTP 502"));
    assert!(out.ends_with("  Fin\n"));
}

#[tokio::test]
async fn test_preview_command_invalid_day() {
    let config = PeekConfig::new()
        .with_entry_api_base("http://127.0.0.1:9/exec")
        .with_image_proxy_base("http://127.0.0.1:9/img");

    let err = preview_day(0, &config, http_client()).await.unwrap_err();
    assert!(matches!(err, PeekError::Entry(_)));
    assert_eq!(err.to_string(), "Day must be between 1 and 31, got 0");
}
