use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and session occupancy.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "coverdesk",
        "open_sessions": state.sessions.len().await,
        "max_sessions": state.config.max_sessions
    }))
}
