//! Health check endpoint.

use axum::Json;
use serde::Serialize;

use crate::pipeline::bloodwork::catalog;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog_size: usize,
}

/// `GET /api/health`
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        catalog_size: catalog().len(),
    })
}
