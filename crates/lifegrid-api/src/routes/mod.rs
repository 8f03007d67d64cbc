//! API route handlers.

mod boards;
mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::types::ApiState;
use crate::ws::ws_handler;

/// Create the API router with all endpoints.
pub fn create_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health::health_handler))
        // Boards
        .route("/boards", post(boards::create_board_handler))
        .route("/boards/{board_id}/next", get(boards::next_generation_handler))
        .route(
            "/boards/{board_id}/state/{generation}",
            get(boards::state_at_generation_handler),
        )
        .route("/boards/{board_id}/final", post(boards::final_state_handler))
        // Streaming session
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}
