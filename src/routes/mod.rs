use crate::telegram::session::SessionStore;
use axum::{Json, Router, extract::State, routing::get};
use serde_json::json;

pub fn routes(sessions: SessionStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(sessions)
}

async fn health(State(sessions): State<SessionStore>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "pending_choices": sessions.len()
    }))
}
