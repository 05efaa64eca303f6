//! Blob proxy behavior against a live mock store.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, Method, StatusCode};
use edge_gateway::config::BlobConfig;
use edge_gateway::http::InboundRequest;
use edge_gateway::proxy::BlobProxy;
use edge_gateway::store::HttpBlobStore;

mod common;

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

fn get(path: &str) -> InboundRequest {
    InboundRequest {
        method: Method::GET,
        path: path.to_string(),
        headers: HeaderMap::new(),
        body: None,
    }
}

/// Store mock serving a small fixed bucket under `/bucket/...`.
async fn start_store(calls: Arc<AtomicU32>) -> std::net::SocketAddr {
    common::start_programmable_backend(move |req| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            match req.path.as_str() {
                "/bucket/data.json" => common::respond_with_type(
                    200,
                    "application/json",
                    b"{\"hello\":\"world\"}".to_vec(),
                ),
                "/bucket/img/logo.png" => {
                    common::respond_with_type(200, "image/png", PNG_BYTES.to_vec())
                }
                "/bucket/notes.txt" => {
                    common::respond_with_type(200, "text/plain", b"plain notes".to_vec())
                }
                "/bucket/secret.bin" => common::respond(403, b"denied".to_vec()),
                _ => common::respond(404, b"no such object".to_vec()),
            }
        }
    })
    .await
}

fn blob_proxy(addr: std::net::SocketAddr, max_object_bytes: usize) -> BlobProxy {
    let config = BlobConfig {
        endpoint: format!("http://{addr}"),
        bucket: "bucket".into(),
        access_token: Some("store-token".into()),
        max_object_bytes,
    };
    let store = HttpBlobStore::new(reqwest::Client::new(), config, Duration::from_millis(1_000));
    BlobProxy::new(Arc::new(store))
}

#[tokio::test]
async fn json_object_round_trips_as_text() {
    let calls = Arc::new(AtomicU32::new(0));
    let addr = start_store(calls).await;
    let proxy = blob_proxy(addr, 16 * 1024 * 1024);

    let response = proxy.handle(get("/assets/data.json")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.is_base64_encoded());
    assert_eq!(response.body_str(), "{\"hello\":\"world\"}");
    assert_eq!(
        response.headers.get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(
        response.headers.get("cache-control").unwrap(),
        "public, max-age=604800, immutable"
    );
}

#[tokio::test]
async fn binary_object_round_trips_through_base64() {
    let calls = Arc::new(AtomicU32::new(0));
    let addr = start_store(calls).await;
    let proxy = blob_proxy(addr, 16 * 1024 * 1024);

    let response = proxy.handle(get("/assets/img/logo.png")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.is_base64_encoded());
    assert_eq!(response.body.to_wire_bytes(), PNG_BYTES);
}

#[tokio::test]
async fn text_object_is_served_raw() {
    let calls = Arc::new(AtomicU32::new(0));
    let addr = start_store(calls).await;
    let proxy = blob_proxy(addr, 16 * 1024 * 1024);

    let response = proxy.handle(get("/assets/notes.txt")).await;
    assert!(!response.is_base64_encoded());
    assert_eq!(response.body_str(), "plain notes");
}

#[tokio::test]
async fn empty_key_is_400_without_store_call() {
    let calls = Arc::new(AtomicU32::new(0));
    let addr = start_store(calls.clone()).await;
    let proxy = blob_proxy(addr, 16 * 1024 * 1024);

    let response = proxy.handle(get("/assets/")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body_str(), "Missing key");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_key_is_404() {
    let calls = Arc::new(AtomicU32::new(0));
    let addr = start_store(calls).await;
    let proxy = blob_proxy(addr, 16 * 1024 * 1024);

    let response = proxy.handle(get("/assets/missing.css")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body_str(), "Not found");
}

#[tokio::test]
async fn denied_object_collapses_to_404() {
    let calls = Arc::new(AtomicU32::new(0));
    let addr = start_store(calls).await;
    let proxy = blob_proxy(addr, 16 * 1024 * 1024);

    let response = proxy.handle(get("/assets/secret.bin")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_object_collapses_to_404() {
    let calls = Arc::new(AtomicU32::new(0));
    let addr = start_store(calls).await;
    // Cap below the PNG payload size.
    let proxy = blob_proxy(addr, 4);

    let response = proxy.handle(get("/assets/img/logo.png")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stalled_object_body_collapses_to_404() {
    // The store answers 200 and trickles a partial body; the drain must be
    // bounded by the deadline, not the server backstop.
    let stalling = common::start_stalling_backend("200 OK").await;
    let proxy = blob_proxy(stalling, 16 * 1024 * 1024);

    let started = std::time::Instant::now();
    let response = proxy.handle(get("/assets/stuck.bin")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn unreachable_store_collapses_to_404() {
    let dead = common::dead_address().await;
    let proxy = blob_proxy(dead, 16 * 1024 * 1024);

    let response = proxy.handle(get("/assets/data.json")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
