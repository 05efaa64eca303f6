//! Response shaping.
//!
//! # Responsibilities
//! - Represent the uniform outbound response every handler terminates in
//! - Carry text bodies as-is and binary bodies as base64 with a flag
//! - Strip framing headers when reshaping an upstream response
//!
//! # Design Decisions
//! - The base64 variant is only ever constructed from raw bytes, so the
//!   "flag set implies valid base64" invariant holds by construction
//! - Handlers never fail: every failure path ends in a well-formed
//!   `OutboundResponse`, so `IntoResponse` is total

use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;

/// Headers that describe the upstream's framing of the body, not the body
/// itself. The gateway re-frames, so these must not pass through.
const FRAMING_HEADERS: [header::HeaderName; 3] = [
    header::TRANSFER_ENCODING,
    header::CONTENT_LENGTH,
    header::CONNECTION,
];

/// Body of an outbound response, tagged with its encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// UTF-8 text, sent verbatim.
    Text(String),
    /// Binary payload, carried as base64.
    Base64(String),
}

impl ResponseBody {
    /// Encode raw object bytes, as text when the classification says so.
    pub fn from_bytes(bytes: &Bytes, is_text: bool) -> Self {
        if is_text {
            ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned())
        } else {
            ResponseBody::Base64(BASE64.encode(bytes))
        }
    }

    /// The raw bytes this body decodes to on the wire.
    pub fn to_wire_bytes(&self) -> Bytes {
        match self {
            ResponseBody::Text(s) => Bytes::copy_from_slice(s.as_bytes()),
            // Constructed from bytes above; decoding cannot fail.
            ResponseBody::Base64(b64) => Bytes::from(BASE64.decode(b64).unwrap_or_default()),
        }
    }
}

/// The uniform response every handler resolves to.
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl OutboundResponse {
    /// A plain-text response, the shape of every diagnostic body.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain"),
        );
        Self {
            status,
            headers,
            body: ResponseBody::Text(body.into()),
        }
    }

    /// Reshape an upstream response: keep status and headers unchanged apart
    /// from the framing headers the server manages itself.
    pub fn from_upstream(status: StatusCode, mut headers: HeaderMap, body: String) -> Self {
        for name in FRAMING_HEADERS {
            headers.remove(&name);
        }
        Self {
            status,
            headers,
            body: ResponseBody::Text(body),
        }
    }

    /// Set a header, replacing any existing value.
    pub fn with_header(mut self, name: header::HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Whether the body is carried base64-encoded.
    pub fn is_base64_encoded(&self) -> bool {
        matches!(self.body, ResponseBody::Base64(_))
    }

    /// The body as text (base64 text for binary bodies).
    pub fn body_str(&self) -> &str {
        match &self.body {
            ResponseBody::Text(s) => s,
            ResponseBody::Base64(b64) => b64,
        }
    }
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> axum::response::Response {
        let bytes = self.body.to_wire_bytes();
        let mut response = Response::builder().status(self.status);
        if let Some(headers) = response.headers_mut() {
            *headers = self.headers;
        }
        match response.body(Body::from(bytes)) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Failed to materialize outbound response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
