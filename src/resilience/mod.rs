//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce a deadline on the whole call)
//!     → On deadline expiry the in-flight future is dropped, which cancels
//!       the request and releases the connection
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - A deadline expiry is distinct from other transport errors so the
//!   failover chain can log it as such
//! - No automatic retries here: the failover proxy's explicit candidate
//!   chain is the only retry-like mechanism in the gateway

pub mod timeouts;

pub use timeouts::{send_with_deadline, FetchError};
