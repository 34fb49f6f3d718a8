use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::connector::api::Container;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub container: Arc<Container>,
    /// Process start, for the uptime reported by /health.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(container: Arc<Container>) -> Self {
        Self {
            container,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Loopback by default; every interface when `public`.
    pub fn new(port: u16, public: bool) -> Self {
        let host = if public { "0.0.0.0" } else { "127.0.0.1" };
        Self {
            host: host.to_string(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Routes:
/// - GET  /api/v1/health
/// - POST /api/v1/classify
/// - GET  /api/v1/cases
///
/// Anything else answers 404.
pub fn build_router(state: AppState) -> axum::Router {
    let api = axum::Router::new()
        .route("/health", get(handlers::health))
        .route("/classify", post(handlers::classify))
        .route("/cases", get(handlers::list_cases));

    let cors = CorsLayer::new()
        .allow_origin(ALLOWED_ORIGINS.map(HeaderValue::from_static))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    axum::Router::new()
        .nest("/api/v1", api)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: &ServerConfig, container: Arc<Container>) -> Result<()> {
    let app = build_router(AppState::new(container));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind HTTP server to {addr}"))?;

    info!("Listening on http://{}/api/v1", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
