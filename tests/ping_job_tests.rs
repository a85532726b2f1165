//! Integration Tests for the keep-alive ping job
//!
//! Runs the job against a local axum server bound to an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use hello_cache::{
    api::JsonCache,
    tasks::{spawn_ping_task, PingService, PingSettings, LAST_RESPONSE_KEY},
};
use serde_json::json;

// == Helper Functions ==

async fn spawn_target() -> SocketAddr {
    let app = Router::new()
        .route("/ok", get(|| async { "pong" }))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Talks to the local target directly, whatever proxy the environment sets
fn ping_service(settings: PingSettings) -> PingService {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    PingService::new(settings).with_client(client)
}

fn settings(url: String) -> PingSettings {
    PingSettings {
        enabled: true,
        url,
        interval: Duration::from_secs(60),
        initial_delay: Duration::ZERO,
    }
}

// == Ping Once Tests ==

#[tokio::test]
async fn test_successful_ping_records_status_and_memoises_body() {
    let addr = spawn_target().await;
    let cache = JsonCache::new(10, Duration::from_secs(60));
    let service =
        ping_service(settings(format!("http://{}/ok", addr))).with_cache(cache.clone());

    service.ping_once().await;

    let status = service.status();
    assert_eq!(status.total_pings, 1);
    assert!(status.last_result.starts_with("SUCCESS - Response time:"));
    assert_ne!(status.last_ping_time, "Never");
    assert_eq!(cache.get(LAST_RESPONSE_KEY), Some(json!("pong")));
}

#[tokio::test]
async fn test_error_status_is_recorded_as_failure() {
    let addr = spawn_target().await;
    let cache = JsonCache::new(10, Duration::from_secs(60));
    let service =
        ping_service(settings(format!("http://{}/broken", addr))).with_cache(cache.clone());

    service.ping_once().await;

    let status = service.status();
    assert_eq!(status.total_pings, 1);
    assert!(status.last_result.starts_with("FAILED - "));
    assert_eq!(cache.get(LAST_RESPONSE_KEY), None);
}

#[tokio::test]
async fn test_unreachable_host_is_recorded_as_failure() {
    // Grab a free port, then release it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = ping_service(settings(format!("http://{}/", addr)));

    service.ping_once().await;
    service.ping_once().await;

    let status = service.status();
    assert_eq!(status.total_pings, 2);
    assert!(status.last_result.starts_with("FAILED - "));
}

// == Scheduled Task Tests ==

#[tokio::test]
async fn test_ping_task_fires_after_initial_delay() {
    let addr = spawn_target().await;
    let service = ping_service(PingSettings {
        initial_delay: Duration::from_millis(50),
        ..settings(format!("http://{}/ok", addr))
    });

    let handle = spawn_ping_task(service.clone());

    assert_eq!(service.status().total_pings, 0);

    let mut fired = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if service.status().last_result.starts_with("SUCCESS") {
            fired = true;
            break;
        }
    }

    handle.abort();
    assert!(fired, "ping task should have completed one attempt");
    assert_eq!(service.status().total_pings, 1);
}

#[tokio::test]
async fn test_disabled_ping_task_never_requests() {
    let addr = spawn_target().await;
    let service = ping_service(PingSettings {
        enabled: false,
        ..settings(format!("http://{}/ok", addr))
    });

    let handle = spawn_ping_task(service.clone());
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.abort();

    let status = service.status();
    assert_eq!(status.total_pings, 0);
    assert_eq!(status.last_result, "Not started");
}
