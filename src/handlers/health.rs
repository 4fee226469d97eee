use axum::Json;
use serde::Serialize;

/// Liveness response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Reports that the process is serving requests.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
