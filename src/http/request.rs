//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID as early as possible for tracing
//! - Buffer the inbound body (bounded) into a handler-friendly shape
//! - Extract routing-relevant information (method, path, headers)
//!
//! # Design Decisions
//! - Handlers consume an owned `InboundRequest`; the axum request is
//!   dismantled once at the edge
//! - GET and HEAD never carry a body, so theirs is skipped outright
//! - Body buffering is capped; an over-limit body is the caller's error

use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use axum::http::{Method, Request};
use bytes::Bytes;
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// An inbound request, buffered and detached from the transport.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl InboundRequest {
    /// Dismantle an axum request, buffering the body up to `max_body_bytes`.
    pub async fn from_request(
        req: Request<Body>,
        max_body_bytes: usize,
    ) -> Result<Self, axum::Error> {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_string();

        let body = if bodyless(&parts.method) {
            None
        } else {
            Some(axum::body::to_bytes(body, max_body_bytes).await?)
        };

        Ok(Self {
            method: parts.method,
            path,
            headers: parts.headers,
            body,
        })
    }

    /// Inbound content type, if the caller sent one.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

/// Methods that carry no body.
pub fn bodyless(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}

/// Layer that stamps every request with an `x-request-id` if it lacks one.
#[derive(Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service side of [`RequestIdLayer`].
#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        if !req.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                req.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(req)
    }
}
