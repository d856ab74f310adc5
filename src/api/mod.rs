// src/api/mod.rs — HTTP transport for the command protocol

pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::router::CommandRouter;
use crate::tts::TtsClient;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub router: Arc<CommandRouter>,
    pub tts: TtsClient,
}

/// Build the axum router with all API routes. CORS is wide open: the caller
/// is a browser front end served from wherever the user put it.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(handlers::api_info))
        .route("/api/health", get(handlers::health))
        .route("/api/search", post(handlers::search))
        .route("/api/search-status/{session_id}", get(handlers::search_status))
        .route("/api/voice-command", post(handlers::voice_command))
        .route("/api/navigate", post(handlers::navigate))
        .route("/api/cart/add", post(handlers::cart_add))
        .route("/api/cart/remove", post(handlers::cart_remove))
        .route("/api/cart/items", get(handlers::cart_items))
        .route("/api/cart/clear", post(handlers::cart_clear))
        .route("/api/cart/checkout", post(handlers::cart_checkout))
        .route("/api/tts", get(handlers::tts))
        .layer(cors)
        .with_state(state)
}

/// Start the API server (blocking).
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let router = build_router(state);

    tracing::info!("VoiceCart API listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
