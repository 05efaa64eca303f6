//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a wall-clock deadline
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the deadline covers the entire
//!   exchange: connect, headers, and the body read that follows
//! - Timeout errors are distinct from other transport errors

use std::time::Duration;

use thiserror::Error;

/// Failure of a single upstream call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The call did not complete within the deadline and was aborted.
    #[error("upstream call exceeded {0:?} deadline")]
    DeadlineExceeded(Duration),

    /// Transport-level failure: DNS, connect, TLS, or a broken stream.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// True when the call was aborted on the deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::DeadlineExceeded(_))
    }

    /// Classify an error raised while reading a response body obtained
    /// through [`send_with_deadline`]. The per-request timer keeps running
    /// through the body read, so a stalled body surfaces here as a reqwest
    /// timeout and is folded into the deadline variant.
    pub fn from_body_read(error: reqwest::Error, deadline: Duration) -> Self {
        if error.is_timeout() {
            FetchError::DeadlineExceeded(deadline)
        } else {
            FetchError::Transport(error)
        }
    }
}

/// Send `request`, bounded by `deadline` measured from call start.
///
/// The deadline is armed twice: a Tokio timeout around the send drops the
/// in-flight future on expiry, aborting the request and returning its
/// connection to the pool, and reqwest's per-request timeout stays armed
/// until the body is fully read, so an upstream that answers headers and
/// then stalls its body cannot hold the caller past the deadline either.
pub async fn send_with_deadline(
    request: reqwest::RequestBuilder,
    deadline: Duration,
) -> Result<reqwest::Response, FetchError> {
    match tokio::time::timeout(deadline, request.timeout(deadline).send()).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) if e.is_timeout() => Err(FetchError::DeadlineExceeded(deadline)),
        Ok(Err(e)) => Err(FetchError::Transport(e)),
        Err(_) => Err(FetchError::DeadlineExceeded(deadline)),
    }
}
