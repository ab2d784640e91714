//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use docgate_core::config::DocGateConfig;
use docgate_retrieval::SearchClient;
use docgate_synthesis::gemini::GeminiClient;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server. Built once at startup; every field is
/// effectively immutable afterwards, so requests share it without locking.
pub struct AppState {
    pub config: DocGateConfig,
    pub search: SearchClient,
    /// `None` when generation is disabled — the synthesizer then assembles
    /// deterministic fallback answers.
    pub model: Option<GeminiClient>,
    pub start_time: std::time::Instant,
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    // Restrict origins when configured; "*" (the default) allows all.
    let cors = if state.config.gateway.allowed_origin.trim() == "*" {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = state
            .config
            .gateway
            .allowed_origin
            .split(',')
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();
        cors.allow_origin(origins)
    };

    Router::new()
        .route("/", get(super::routes::root))
        .route("/health", get(super::routes::health_check))
        .route("/chat", post(super::routes::chat))
        .route("/debug-retrieve", get(super::routes::debug_retrieve))
        .route("/configs", get(super::routes::configs))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server. Blocks until the listener shuts down.
pub async fn start(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.gateway.host, state.config.gateway.port);
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Gateway listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
