//! HTTP API for the knowledge-base console.
//!
//! Routes:
//! - `/` — the single-page UI
//! - `/health` — liveness
//! - `/ws` — WebSocket stub (not used by the UI)
//! - `/api/documents` — document upload and ingestion
//! - `/api/chat` — chat with the retrieval backend

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    response::Html,
    routing::{delete, get, post},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::KnowledgeBaseClient;
use crate::config::StaticConfig;
use crate::error::ServiceError;
use crate::session::SessionStore;
use crate::websocket::ws_handler;

pub mod chat;
pub mod documents;

use chat::{chat_handler, clear_chat_handler, get_chat_handler};
use documents::upload_document_handler;

/// Application state
pub struct AppState {
    pub config: StaticConfig,
    pub kb_client: KnowledgeBaseClient,
    pub sessions: SessionStore,
    pub start_time: Instant,
}

/// Build the API router
pub fn router(config: StaticConfig) -> Result<Router, ServiceError> {
    let kb_client = KnowledgeBaseClient::new(config.backend.clone())?;

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body_size = config.limits.max_upload_bytes;

    let state = Arc::new(AppState {
        kb_client,
        sessions: SessionStore::new(),
        start_time: Instant::now(),
        config,
    });

    let api_routes = Router::new()
        .route(
            "/documents",
            post(upload_document_handler).layer(DefaultBodyLimit::max(max_body_size)),
        )
        .route("/chat", post(chat_handler))
        .route("/chat/{session_id}", get(get_chat_handler))
        .route("/chat/{session_id}", delete(clear_chat_handler));

    Ok(Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serve the embedded single-page UI
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
