pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(health::health_handler))
        .route("/api/screen", post(handlers::handle_screen))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
