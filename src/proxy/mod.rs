//! Request handlers.
//!
//! # Data Flow
//! ```text
//! axum route
//!     → http/request.rs (buffer into InboundRequest)
//!     → one of the four handlers below
//!     → http/response.rs (uniform OutboundResponse)
//! ```
//!
//! # Design Decisions
//! - The four handlers are independent entry points; none calls another
//! - Each is stateless per request and holds only injected configuration
//!   plus the shared outbound client
//! - Every handler is total: all failure paths end in a response

pub mod blob;
pub mod dispatch;
pub mod failover;
pub mod render;

pub use blob::BlobProxy;
pub use dispatch::DispatchTrigger;
pub use failover::FailoverProxy;
pub use render::RenderProxy;
