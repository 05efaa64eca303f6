//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the shared outbound client and the four handlers from config
//! - Create the Axum router mounting each handler under its route prefix
//! - Wire up middleware (request timeout, request ID, tracing)
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - Handlers receive their configuration at construction, never from
//!   globals, so tests run them against fake endpoints
//! - One reqwest client is shared by all handlers; per-call deadlines live
//!   in the resilience layer, the server-level timeout is a backstop sized
//!   to let the failover chain exhaust every candidate

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::request::{InboundRequest, RequestIdLayer};
use crate::http::response::OutboundResponse;
use crate::proxy::{BlobProxy, DispatchTrigger, FailoverProxy, RenderProxy};
use crate::store::HttpBlobStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub failover: Arc<FailoverProxy>,
    pub render: Arc<RenderProxy>,
    pub blob: Arc<BlobProxy>,
    pub dispatch: Arc<DispatchTrigger>,
    pub max_body_bytes: usize,
}

/// HTTP server for the edge gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server with the given configuration.
    ///
    /// Fails only if the shared outbound client cannot be constructed
    /// (TLS backend initialization).
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("edge-gateway/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_millis(config.timeouts.connect_ms))
            .build()?;
        let deadline = Duration::from_millis(config.timeouts.upstream_ms);

        let store = Arc::new(HttpBlobStore::new(
            client.clone(),
            config.blob.clone(),
            deadline,
        ));
        let state = AppState {
            failover: Arc::new(FailoverProxy::new(
                client.clone(),
                config.failover.clone(),
                deadline,
            )),
            render: Arc::new(RenderProxy::new(
                client.clone(),
                config.render.clone(),
                deadline,
            )),
            blob: Arc::new(BlobProxy::new(store)),
            dispatch: Arc::new(DispatchTrigger::new(client, config.dispatch.clone(), deadline)),
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api", any(api_handler))
            .route("/api/{*subpath}", any(api_handler))
            .route("/page", get(page_handler))
            .route("/page/{*path}", get(page_handler))
            .route("/assets", get(asset_handler))
            .route("/assets/{*key}", get(asset_handler))
            .route("/tasks/dispatch", post(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

async fn buffer(state: &AppState, request: Request<Body>) -> Result<InboundRequest, Response> {
    InboundRequest::from_request(request, state.max_body_bytes)
        .await
        .map_err(|error| {
            tracing::warn!(error = %error, "Failed to buffer request body");
            OutboundResponse::text(StatusCode::BAD_REQUEST, "Unreadable request body")
                .into_response()
        })
}

async fn api_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match buffer(&state, request).await {
        Ok(inbound) => state.failover.handle(inbound).await.into_response(),
        Err(response) => response,
    }
}

async fn page_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match buffer(&state, request).await {
        Ok(inbound) => state.render.handle(inbound).await.into_response(),
        Err(response) => response,
    }
}

async fn asset_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match buffer(&state, request).await {
        Ok(inbound) => state.blob.handle(inbound).await.into_response(),
        Err(response) => response,
    }
}

async fn dispatch_handler(State(state): State<AppState>) -> Response {
    state.dispatch.handle().await.into_response()
}
