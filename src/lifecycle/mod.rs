//! Lifecycle management.
//!
//! # Design Decisions
//! - One broadcast channel fans the shutdown signal out to the server and
//!   to tests driving it
//! - Shutdown is cooperative: the server stops accepting and drains

pub mod shutdown;

pub use shutdown::Shutdown;
