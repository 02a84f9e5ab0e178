use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
pub async fn get_health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
