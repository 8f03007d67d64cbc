//! Streaming session: one cycle-detector run per WebSocket connection.
//!
//! The detector is CPU-bound and synchronous, so it runs on a blocking
//! task and hands `(generation, dense state)` events to the session task
//! through an unbounded channel. The channel preserves generation order
//! and the terminal frame is never dropped. If the client goes away the
//! receiver is dropped, the next progress send fails, and the detector
//! aborts cooperatively; nothing is written after the channel closes.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use lifegrid_automaton::{CycleDetector, CycleOutcome, DetectorConfig, DetectorError};
use lifegrid_store::StoreError;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::types::{ApiState, SessionFrame};
use crate::validation::{is_board_id, validate_max_attempts};

/// Query parameters supplied at session open.
///
/// Both fields are optional strings so that missing or malformed values
/// reach the session and fail with an error frame plus a policy close,
/// rather than being rejected before the upgrade.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionParams {
    #[serde(rename = "boardId")]
    board_id: Option<String>,
    #[serde(rename = "maxAttempts")]
    max_attempts: Option<String>,
}

/// Handler for WebSocket upgrade at GET /ws
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<SessionParams>,
    State(state): State<Arc<ApiState>>,
) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, state, params))
}

/// Events flowing from the detector task to the session task.
enum SessionEvent {
    Progress { generation: u64, state: Vec<Vec<u8>> },
    Finished(Result<CycleOutcome, DetectorError>),
}

/// Drive one full session on an upgraded socket.
async fn run_session(mut socket: WebSocket, state: Arc<ApiState>, params: SessionParams) {
    let (board_id, max_attempts) = match validate_params(&params) {
        Ok(parsed) => parsed,
        Err(message) => {
            warn!(reason = %message, "session_rejected");
            fail_session(&mut socket, &message, close_code::POLICY).await;
            return;
        }
    };

    let record = match state.repository.get_board(&board_id).await {
        Ok(record) => record,
        Err(StoreError::NotFound { .. }) => {
            fail_session(&mut socket, "Board not found", close_code::POLICY).await;
            return;
        }
        Err(e) => {
            fail_session(&mut socket, &e.to_string(), close_code::ERROR).await;
            return;
        }
    };
    let board = match record.to_board() {
        Ok(board) => board,
        Err(e) => {
            fail_session(&mut socket, &e.to_string(), close_code::ERROR).await;
            return;
        }
    };

    info!(%board_id, max_attempts, "session_started");

    let (tx, mut rx) = mpsc::unbounded_channel::<SessionEvent>();
    let detector = CycleDetector::new(DetectorConfig::new(max_attempts));
    let worker = tokio::task::spawn_blocking(move || {
        let progress = tx.clone();
        let result = detector.run(board, |generation, board| {
            progress
                .send(SessionEvent::Progress {
                    generation,
                    state: board.to_dense(),
                })
                .map_err(|_| DetectorError::ProgressAborted {
                    generation,
                    message: "session channel closed".to_string(),
                })
        });
        let _ = tx.send(SessionEvent::Finished(result));
    });

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(SessionEvent::Progress { generation, state }) => {
                    let frame = SessionFrame::Progress { generation, state };
                    if send_frame(&mut socket, &frame).await.is_err() {
                        break;
                    }
                }
                Some(SessionEvent::Finished(Ok(outcome))) => {
                    let frame = SessionFrame::from_outcome(&outcome);
                    if send_frame(&mut socket, &frame).await.is_ok() {
                        info!(%board_id, generation = outcome.generation(), "session_complete");
                        close_session(&mut socket, close_code::NORMAL, "Calculation complete")
                            .await;
                    }
                    break;
                }
                Some(SessionEvent::Finished(Err(DetectorError::ProgressAborted { .. }))) => {
                    // The client went away mid-run; there is nobody to tell.
                    debug!(%board_id, "session_aborted_by_client");
                    break;
                }
                Some(SessionEvent::Finished(Err(e))) => {
                    fail_session(&mut socket, &e.to_string(), close_code::ERROR).await;
                    break;
                }
                // The worker dropped the channel without a result: it
                // panicked. Surface an internal error.
                None => {
                    fail_session(&mut socket, "Internal server error", close_code::ERROR).await;
                    break;
                }
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => {
                    debug!(%board_id, "client_closed_session");
                    break;
                }
                Some(Ok(_)) => {
                    // Ignore pings, pongs, and stray client frames.
                }
                Some(Err(e)) => {
                    warn!(%board_id, error = %e, "session_socket_error");
                    break;
                }
            }
        }
    }

    // Dropping the receiver unblocks a still-running detector: its next
    // progress send fails and the run aborts.
    drop(rx);
    if let Err(e) = worker.await {
        warn!(%board_id, error = %e, "detector_task_failed");
    }
}

fn validate_params(params: &SessionParams) -> Result<(String, u64), String> {
    let board_id = params
        .board_id
        .as_deref()
        .ok_or_else(|| "Missing boardId parameter".to_string())?;
    if !is_board_id(board_id) {
        return Err("Invalid board id".to_string());
    }

    let raw = params
        .max_attempts
        .as_deref()
        .ok_or_else(|| "Missing maxAttempts parameter".to_string())?;
    let max_attempts = raw
        .parse::<i64>()
        .map_err(|_| format!("Invalid maxAttempts: {raw:?}"))
        .and_then(validate_max_attempts)?;

    Ok((board_id.to_string(), max_attempts))
}

/// Serialise and send one frame; an error means the socket is gone.
async fn send_frame(socket: &mut WebSocket, frame: &SessionFrame) -> Result<(), axum::Error> {
    let json = serde_json::to_string(frame).expect("session frames always serialise");
    socket.send(Message::Text(json.into())).await
}

/// Emit an error frame, then close with the given code.
///
/// The full message travels in the error frame; the close frame carries a
/// short fixed reason because close reasons are length-limited.
async fn fail_session(socket: &mut WebSocket, message: &str, code: u16) {
    let frame = SessionFrame::Error {
        error: message.to_string(),
    };
    let _ = send_frame(socket, &frame).await;

    let reason = if code == close_code::POLICY {
        "Policy violation"
    } else {
        "Internal error"
    };
    close_session(socket, code, reason).await;
}

/// Close the socket; failures just mean the peer is already gone.
async fn close_session(socket: &mut WebSocket, code: u16, reason: &str) {
    let frame = CloseFrame {
        code,
        reason: Utf8Bytes::from(reason.to_string()),
    };
    let _ = socket.send(Message::Close(Some(frame))).await;
}
