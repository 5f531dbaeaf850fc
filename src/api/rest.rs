use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use std::sync::Arc;

use crate::pusher::StatusSnapshot;
use crate::pusher::scheduler::PusherScheduler;

pub struct ApiState {
    pub scheduler: Arc<PusherScheduler>,
}

/// Health probe surface: a GET on the root returns the status snapshot,
/// everything else gets a plain not-found.
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(get_status).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
}

async fn get_status(State(state): State<Arc<ApiState>>) -> Json<StatusSnapshot> {
    Json(state.scheduler.status())
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}
