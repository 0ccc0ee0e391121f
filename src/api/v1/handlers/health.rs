/*
 * Responsibility
 * - GET /health (liveness probe)
 * - also handy for checking which middleware a request passes through
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
