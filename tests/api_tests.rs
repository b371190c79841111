//! HTTP API tests against a live server on a loopback port.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tower::ServiceExt;

use availability_monitor::config::ListenerConfig;
use availability_monitor::http::HttpServer;
use availability_monitor::lifecycle::Services;
use availability_monitor::storage::RecordSink;

mod common;

use common::{services_for, start_mock_target, Reply};

async fn spawn_api(services: &Services) -> (SocketAddr, broadcast::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = broadcast::channel(1);
    let server = HttpServer::new(&ListenerConfig::default(), services.app_state());
    tokio::spawn(server.run(listener, rx));
    (addr, tx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_manual_check_endpoint() {
    let target = start_mock_target(|_| Reply::ok("hello")).await;
    let (services, _sink) = services_for(&target.url(), 5);
    let (addr, _shutdown) = spawn_api(&services).await;

    let res = client().get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["url"], target.url());
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["available"], true);
    assert_eq!(body["response_size_bytes"], 5);
    assert_eq!(body["consecutive_failures"], 0);
    assert_eq!(body["availability_pct_since_start"], 100.0);
    assert_eq!(body["source"], "manual");
    assert!(body["latency_ms"].is_number());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_manual_check_survives_client_disconnect() {
    let target = start_mock_target(|_| Reply::ok("slow").after(Duration::from_millis(800))).await;
    let (services, sink) = services_for(&target.url(), 5);
    let (addr, _shutdown) = spawn_api(&services).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(stream);

    for _ in 0..100 {
        if services.runner.stats().snapshot().total_checks > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    assert_eq!(target.hits.load(Ordering::SeqCst), 1);
    assert_eq!(services.runner.stats().snapshot().total_checks, 1);
    services.writer.flush().await;
    let records = sink.get_last(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].ok);
}

#[tokio::test]
async fn test_records_limit_and_order() {
    let target = start_mock_target(|_| Reply::status(500, "down")).await;
    let (services, _sink) = services_for(&target.url(), 5);
    let (addr, _shutdown) = spawn_api(&services).await;
    let client = client();

    for _ in 0..5 {
        let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["available"], false);
        assert_eq!(body["status_code"], 500);
    }
    services.writer.flush().await;

    let res = client
        .get(format!("http://{}/records?limit=2", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["count"], 2);
    let items = page["items"].as_array().unwrap();
    let streaks: Vec<u64> = items
        .iter()
        .map(|r| r["consecutive_failures"].as_u64().unwrap())
        .collect();
    assert_eq!(streaks, vec![4, 5]);
    assert!(items[0]["ts_iso"].as_str().unwrap().ends_with('Z'));
    assert_eq!(items[0]["source"], "manual");
    assert_eq!(items[0]["ok"], false);

    let res = client.get(format!("http://{}/records", addr)).send().await.unwrap();
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["count"], 5);
}

#[tokio::test]
async fn test_records_rejects_bad_limit() {
    let target = start_mock_target(|_| Reply::ok("")).await;
    let (services, _sink) = services_for(&target.url(), 5);
    let (addr, _shutdown) = spawn_api(&services).await;
    let client = client();

    for limit in ["0", "1001", "-1", "abc"] {
        let res = client
            .get(format!("http://{}/records?limit={}", addr, limit))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "limit={}", limit);
        let body: Value = res.json().await.unwrap();
        assert!(body["detail"].is_string(), "limit={}", limit);
    }
}

#[tokio::test]
async fn test_stats_after_checks() {
    let target = start_mock_target(|n| {
        if n < 3 {
            Reply::ok("up")
        } else {
            Reply::status(503, "down")
        }
    })
    .await;
    let (services, _sink) = services_for(&target.url(), 5);
    let (addr, _shutdown) = spawn_api(&services).await;
    let client = client();

    for _ in 0..4 {
        client.get(format!("http://{}/", addr)).send().await.unwrap();
    }

    let stats: Value = client
        .get(format!("http://{}/stats", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["target_url"], target.url());
    assert_eq!(stats["total_checks"], 4);
    assert_eq!(stats["ok_checks"], 3);
    assert_eq!(stats["availability_pct"], 75.0);
    assert_eq!(stats["consecutive_failures"], 1);
}

#[tokio::test]
async fn test_stats_before_any_check() {
    let (services, _sink) = services_for("http://127.0.0.1:9/", 1);
    let router = HttpServer::new(&ListenerConfig::default(), services.app_state()).router();

    let response = router
        .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let stats: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stats["total_checks"], 0);
    assert_eq!(stats["ok_checks"], 0);
    assert!(stats["availability_pct"].is_null());
    assert_eq!(stats["consecutive_failures"], 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (services, _sink) = services_for("http://127.0.0.1:9/", 1);
    let router = HttpServer::new(&ListenerConfig::default(), services.app_state()).router();

    let response = router
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
