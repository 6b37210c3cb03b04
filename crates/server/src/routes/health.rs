use axum::http::StatusCode;

/// Simple endpoint that returns "OK" when the service is running properly
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
