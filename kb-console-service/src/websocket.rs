//! WebSocket endpoint.
//!
//! Not used by the bundled UI. Connections are accepted only from the
//! configured allowed origins; each text frame is answered with an echo of
//! itself. A real reply pipeline has not been implemented, so this stays a
//! stub rather than guessing at one.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::AppState;

/// Upgrade to a WebSocket connection, refusing disallowed origins
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    if !origin_allowed(&state.config.cors.allowed_origins, origin) {
        warn!(origin = ?origin, "Refusing WebSocket connection from disallowed origin");
        return StatusCode::FORBIDDEN.into_response();
    }

    ws.on_upgrade(handle_socket)
}

fn origin_allowed(allowed: &[String], origin: Option<&str>) -> bool {
    match origin {
        Some(origin) => allowed.iter().any(|candidate| candidate == origin),
        None => false,
    }
}

async fn handle_socket(mut socket: WebSocket) {
    info!("WebSocket connection established");

    while let Some(result) = socket.recv().await {
        match result {
            Ok(Message::Text(text)) => {
                debug!(len = text.len(), "Echoing text frame");
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket connection closed by client");
                break;
            }
            Ok(_) => {
                // Binary/ping/pong frames are ignored; axum answers pings
                // on its own.
            }
            Err(e) => {
                warn!(error = %e, "WebSocket error");
                break;
            }
        }
    }

    info!("WebSocket connection closed");
}
