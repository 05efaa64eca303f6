//! Shared utilities for integration testing.
//!
//! Mock upstream backends are real axum servers bound to ephemeral ports,
//! so the handlers under test speak genuine HTTP/1.1 to them.

use std::future::Future;
use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Start a programmable mock backend; every request is recorded and handed
/// to `f`, whose response is sent back. Returns the bound address.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let f = f.clone();
        async move {
            let (parts, body) = request.into_parts();
            let bytes = axum::body::to_bytes(body, 64 * 1024 * 1024)
                .await
                .unwrap_or_default();
            let recorded = RecordedRequest {
                method: parts.method,
                path: parts.uri.path().to_string(),
                headers: parts.headers,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            };
            f(recorded).await
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a mock backend that always answers with a fixed status and body.
#[allow(dead_code)]
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_req| async move { respond(status, body.into()) }).await
}

/// Build a plain response for a mock backend.
#[allow(dead_code)]
pub fn respond(status: u16, body: Vec<u8>) -> Response {
    Response::builder()
        .status(status)
        .body(Body::from(body))
        .unwrap()
}

/// Build a response with an explicit content type.
#[allow(dead_code)]
pub fn respond_with_type(status: u16, content_type: &str, body: Vec<u8>) -> Response {
    Response::builder()
        .status(status)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap()
}

/// An address nothing listens on; connects are refused immediately.
#[allow(dead_code)]
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start a backend that answers the status line and headers promptly, sends
/// a few body bytes, then stalls without ever finishing the body. Speaks raw
/// TCP because the stall has to happen mid-stream, below the HTTP layer.
#[allow(dead_code)]
pub async fn start_stalling_backend(status_line: &'static str) -> SocketAddr {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let head = format!(
                            "HTTP/1.1 {status_line}\r\nContent-Length: 1048576\r\n\r\npartial"
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        // Hold the connection open; the rest never arrives.
                        tokio::time::sleep(std::time::Duration::from_secs(600)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}
