//! API types, DTOs, and the streaming frame encoding.

use std::sync::Arc;

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lifegrid_automaton::CycleOutcome;
use lifegrid_store::{BoardRepository, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Shared application state for the API.
pub struct ApiState {
    /// The board repository over the durable store and shared cache.
    pub repository: Arc<BoardRepository>,
}

/// Success envelope: `{"success": true, "data": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true` for this envelope.
    pub success: bool,
    /// Response payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope: `{"success": false, "error": "<message>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false` for this envelope.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
}

impl ApiErrorResponse {
    /// Wrap a message in the failure envelope.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Build a failure response with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiErrorResponse::new(message))).into_response()
}

/// JSON body extractor that fails with the standard error envelope.
///
/// axum's own `Json` rejection replies with a plain-text body, which would
/// leave malformed request bodies outside the `{"success": false, ...}`
/// surface every other client error uses. This wrapper folds the rejection
/// into a 400 failure envelope instead.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(error_response(
                StatusCode::BAD_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}

/// Map a repository error onto the HTTP surface.
///
/// Validation errors are the client's fault (400), missing boards are 404,
/// everything else is a backend-side 500. Cache errors never reach here;
/// the repository swallows them.
pub fn store_error_response(err: &StoreError) -> Response {
    let status = match err {
        StoreError::InvalidBoard(_) | StoreError::InvalidGeneration { .. } => {
            StatusCode::BAD_REQUEST
        }
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

// =============================================================================
// Request / Response DTOs
// =============================================================================

/// Body of `POST /boards`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoardRequest {
    /// Dense 0/1 seed matrix.
    pub board: Vec<Vec<u8>>,
}

/// Data payload for a created board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCreated {
    /// The minted board identifier.
    pub board_id: String,
}

/// Data payload for `GET /boards/{id}/next`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextState {
    /// Dense state one generation after the seed.
    pub state: Vec<Vec<u8>>,
}

/// Data payload for `GET /boards/{id}/state/{generation}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationState {
    /// Dense state at the requested generation.
    pub state: Vec<Vec<u8>>,
    /// The requested generation.
    pub generation: u64,
}

/// Body of `POST /boards/{id}/final`.
///
/// `max_attempts` is signed so that out-of-range values reach the
/// validator and produce a 400 envelope instead of a decode rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalRequest {
    /// Attempt ceiling for the cycle-detection run.
    pub max_attempts: i64,
}

/// Data payload acknowledging a final-state run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalInitiated {
    /// Human-readable acknowledgement.
    pub message: String,
    /// Where to attach for progress and the result.
    pub websocket_url: String,
}

/// Data payload for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthData {
    /// Service status.
    pub status: String,
}

// =============================================================================
// Streaming frames
// =============================================================================

/// Terminal status carried by a `final` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalStatus {
    Stable,
    Oscillating,
    Timeout,
}

/// A text frame on the streaming session channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionFrame {
    /// One generation of progress.
    Progress {
        generation: u64,
        state: Vec<Vec<u8>>,
    },
    /// The detector's terminal result; strictly the last frame.
    Final {
        status: FinalStatus,
        generation: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        period: Option<u64>,
        state: Vec<Vec<u8>>,
    },
    /// A session failure.
    Error { error: String },
}

impl SessionFrame {
    /// Encode a detector outcome as the terminal frame.
    pub fn from_outcome(outcome: &CycleOutcome) -> Self {
        match outcome {
            CycleOutcome::Stable { generation, board } => SessionFrame::Final {
                status: FinalStatus::Stable,
                generation: *generation,
                period: None,
                state: board.to_dense(),
            },
            CycleOutcome::Oscillating {
                generation,
                period,
                board,
            } => SessionFrame::Final {
                status: FinalStatus::Oscillating,
                generation: *generation,
                period: Some(*period),
                state: board.to_dense(),
            },
            CycleOutcome::Timeout { generation, board } => SessionFrame::Final {
                status: FinalStatus::Timeout,
                generation: *generation,
                period: None,
                state: board.to_dense(),
            },
        }
    }
}
