//! REST endpoints for the registration chat.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::manager::RegistrationManager;

/// Shared state for the chat routes.
#[derive(Clone)]
pub struct ChatRouteState {
    pub manager: Arc<RegistrationManager>,
}

/// Body of POST /api/chat. A missing or unknown `session_id` starts a new
/// session; the reply carries the id to send with the next message.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub message: String,
}

/// POST /api/chat
///
/// Runs one round-trip of the registration conversation. Always 200 with
/// the full reply shape; upstream failures surface as fixed user-facing
/// messages with the session unchanged.
async fn post_chat(
    State(state): State<ChatRouteState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let reply = state
        .manager
        .handle_message(request.session_id, &request.message)
        .await;
    Json(reply)
}

/// GET /api/registration/{session_id}
///
/// Read-only session snapshot; 404 for unknown ids (never creates).
async fn get_status(
    State(state): State<ChatRouteState>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.manager.status(session_id).await {
        Some(status) => Json(status).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Unknown session"})),
        )
            .into_response(),
    }
}

/// Build the chat REST routes. CORS is permissive for the browser client.
pub fn chat_routes(state: ChatRouteState) -> Router {
    Router::new()
        .route("/api/chat", post(post_chat))
        .route("/api/registration/{session_id}", get(get_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
