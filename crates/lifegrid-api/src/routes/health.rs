//! Health check endpoint.

use axum::Json;

use crate::types::{ApiResponse, HealthData};

/// Handler for GET /health
pub async fn health_handler() -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse::new(HealthData {
        status: "ok".to_string(),
    }))
}
