//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, route dispatch, middleware)
//!     → request.rs (request ID, buffer into InboundRequest)
//!     → proxy handlers
//!     → response.rs (uniform OutboundResponse, encoding flag)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, RequestIdLayer, X_REQUEST_ID};
pub use response::{OutboundResponse, ResponseBody};
pub use server::HttpServer;
