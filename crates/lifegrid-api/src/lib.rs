//! REST + WebSocket API service for lifegrid.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /boards` - Upload a seed board, returns the minted id
//! - `GET /boards/{id}/next` - Dense state one generation after the seed
//! - `GET /boards/{id}/state/{g}` - Dense state after `g` generations
//! - `POST /boards/{id}/final` - Initiate a streamed final-state search
//! - `GET /ws?boardId=...&maxAttempts=...` - Streaming session carrying
//!   per-generation `progress` frames and a terminal `final` frame
//!
//! Every HTTP response is wrapped in the `{"success": ..., ...}` envelope.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lifegrid_api::{create_api_state, create_router};
//! use lifegrid_store::{BoardRepository, CacheTtls, MemoryCache, MemoryStore};
//!
//! let repository = Arc::new(BoardRepository::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryCache::new()),
//!     CacheTtls::default(),
//! ));
//! let state = create_api_state(repository);
//! let router = create_router(state);
//! ```

mod routes;
mod types;
mod validation;
mod ws;

pub use routes::create_router;
pub use types::{
    ApiErrorResponse, ApiResponse, ApiState, BoardCreated, CreateBoardRequest, FinalInitiated,
    FinalRequest, FinalStatus, GenerationState, HealthData, NextState, SessionFrame,
};
pub use validation::{is_board_id, validate_board_matrix, validate_max_attempts, MAX_ATTEMPTS_LIMIT};

use std::sync::Arc;

use lifegrid_store::BoardRepository;

/// Create a new API state over the given repository.
pub fn create_api_state(repository: Arc<BoardRepository>) -> Arc<ApiState> {
    Arc::new(ApiState { repository })
}
