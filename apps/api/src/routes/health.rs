use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "Reflexion Interviewer API";

/// GET /health
/// Returns service status and the number of live interview sessions.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let active_sessions = state.sessions.count().await?;
    Ok(Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "active_sessions": active_sessions,
        "session_backend": state.sessions.backend_name(),
    })))
}

/// GET /
/// Service information; replaced by the static front end when `FRONTEND_DIR` is set.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health"
    }))
}

/// GET /debug/sessions
/// Lists live session ids. Mounted only when `ENABLE_DEBUG_ROUTES=true`.
pub async fn debug_sessions_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let session_ids = state.sessions.list_ids().await?;
    Ok(Json(json!({
        "session_count": session_ids.len(),
        "session_ids": session_ids,
    })))
}
