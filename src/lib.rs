//! Edge gateway library: failover, render, blob, and dispatch handlers
//! behind one HTTP surface.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod proxy;
pub mod resilience;
pub mod routing;
pub mod store;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
