use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct HealthReport {
    status: &'static str,
}

pub(crate) async fn health() -> Json<HealthReport> {
    Json(HealthReport { status: "ok" })
}
