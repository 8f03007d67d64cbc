//! Board endpoints: seed upload, next-generation and generation-G reads,
//! and initiation of a streamed final-state search.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::types::{
    error_response, store_error_response, ApiJson, ApiResponse, ApiState, BoardCreated,
    CreateBoardRequest, FinalInitiated, FinalRequest, GenerationState, NextState,
};
use crate::validation::{
    is_board_id, parse_generation, validate_board_matrix, validate_max_attempts,
};

/// POST /boards - upload a seed board.
pub async fn create_board_handler(
    State(state): State<Arc<ApiState>>,
    ApiJson(request): ApiJson<CreateBoardRequest>,
) -> Response {
    if let Err(message) = validate_board_matrix(&request.board) {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    match state.repository.create_board(&request.board).await {
        Ok(board_id) => {
            info!(%board_id, "board_uploaded");
            (
                StatusCode::CREATED,
                Json(ApiResponse::new(BoardCreated { board_id })),
            )
                .into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// GET /boards/{id}/next - state one generation after the seed.
pub async fn next_generation_handler(
    State(state): State<Arc<ApiState>>,
    Path(board_id): Path<String>,
) -> Response {
    if !is_board_id(&board_id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid board id");
    }

    match state.repository.get_next_generation(&board_id).await {
        Ok(dense) => Json(ApiResponse::new(NextState { state: dense })).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// GET /boards/{id}/state/{generation} - state after G generations.
///
/// Both path segments arrive raw and are validated here, so malformed
/// values get the failure envelope rather than an extractor rejection.
pub async fn state_at_generation_handler(
    State(state): State<Arc<ApiState>>,
    Path((board_id, generation)): Path<(String, String)>,
) -> Response {
    if !is_board_id(&board_id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid board id");
    }
    let generation = match parse_generation(&generation) {
        Ok(generation) => generation,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match state
        .repository
        .get_state_at_generation(&board_id, generation)
        .await
    {
        Ok(dense) => Json(ApiResponse::new(GenerationState {
            state: dense,
            generation,
        }))
        .into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// POST /boards/{id}/final - initiate a streamed final-state search.
///
/// The computation itself runs on the streaming session; this endpoint
/// validates the parameters, confirms the board exists, and points the
/// client at the channel.
pub async fn final_state_handler(
    State(state): State<Arc<ApiState>>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<FinalRequest>,
) -> Response {
    if !is_board_id(&board_id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid board id");
    }
    let max_attempts = match validate_max_attempts(request.max_attempts) {
        Ok(v) => v,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    if let Err(e) = state.repository.get_board(&board_id).await {
        return store_error_response(&e);
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let websocket_url = format!("ws://{host}/ws?boardId={board_id}&maxAttempts={max_attempts}");

    info!(%board_id, max_attempts, "final_state_initiated");
    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(FinalInitiated {
            message: "Final state calculation initiated".to_string(),
            websocket_url,
        })),
    )
        .into_response()
}
