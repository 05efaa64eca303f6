//! Route-prefix handling.
//!
//! # Responsibilities
//! - Define the fixed public prefixes the gateway mounts handlers under
//! - Strip a prefix from an inbound path to get the logical key/subpath
//!
//! # Design Decisions
//! - Which prefix maps to which handler is fixed at compile time; the
//!   hosting router (axum) does the dispatch, handlers do the stripping
//! - Path matching is case-sensitive
//! - A bare prefix with no trailing segment ("/api") strips to the empty
//!   string, which each handler interprets on its own terms

/// Prefix for the failover proxy.
pub const API_PREFIX: RoutePrefix = RoutePrefix::new("/api/");

/// Prefix for the render proxy.
pub const PAGE_PREFIX: RoutePrefix = RoutePrefix::new("/page/");

/// Prefix for the blob proxy.
pub const ASSETS_PREFIX: RoutePrefix = RoutePrefix::new("/assets/");

/// A fixed leading path prefix that maps a public route to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePrefix {
    prefix: &'static str,
}

impl RoutePrefix {
    /// Create a prefix. Must start and end with `/`.
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    /// The raw prefix string.
    pub fn as_str(&self) -> &'static str {
        self.prefix
    }

    /// Strip the prefix from `path`, returning the logical remainder.
    ///
    /// `/api/users/1` with prefix `/api/` yields `users/1`; the bare
    /// `/api` (and `/api/`) yield the empty string. A path that does not
    /// carry the prefix at all is returned with its leading slash removed,
    /// so handlers always see a relative key.
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        if let Some(rest) = path.strip_prefix(self.prefix) {
            return rest;
        }
        if path == self.prefix.trim_end_matches('/') {
            return "";
        }
        path.trim_start_matches('/')
    }
}
