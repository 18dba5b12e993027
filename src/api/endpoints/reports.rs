//! Report upload: decode, process, persist.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use base64::Engine;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::MAX_REPORT_BYTES;
use crate::models::StoredMarker;
use crate::pipeline::report::{parse_report_date, ProcessingOutcome, ReportRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub user_id: String,
    pub report_date: Option<String>,
    pub report_id: Option<String>,
    pub file_name: Option<String>,
    /// Plain text, or a base64 data URL (`data:text/plain;base64,...`).
    pub data: String,
}

/// `POST /api/reports`
pub async fn upload(
    State(ctx): State<ApiContext>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<ProcessingOutcome>, ApiError> {
    let Json(payload) = payload?;

    let user_id = payload.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::BadRequest("userId is required".into()));
    }

    let bytes = decode_report_data(&payload.data)
        .map_err(|e| ApiError::BadRequest(format!("Invalid report data: {e}")))?;
    if bytes.len() > MAX_REPORT_BYTES {
        return Err(ApiError::BadRequest(format!(
            "Report exceeds 2 MB size limit ({} bytes)",
            bytes.len()
        )));
    }

    let report_date = payload
        .report_date
        .as_deref()
        .map(parse_report_date)
        .transpose()?;

    let request = ReportRequest {
        user_id: user_id.to_string(),
        report_date,
        report_id: payload.report_id,
        file_name: payload.file_name,
        source: None,
    };

    tracing::info!(user_id, bytes = bytes.len(), "Report upload received");
    let outcome = ctx.processor.process(&bytes, &request)?;
    Ok(Json(outcome))
}

/// `GET /api/reports/:report_id/markers`: per-marker detail of one report.
pub async fn markers(
    State(ctx): State<ApiContext>,
    Path(report_id): Path<String>,
) -> Result<Json<Vec<StoredMarker>>, ApiError> {
    let markers = ctx.processor.report_markers(&report_id)?;
    if markers.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No stored markers for report {report_id}"
        )));
    }
    Ok(Json(markers))
}

/// Decode report data: a base64 data URL, or the text itself.
fn decode_report_data(data: &str) -> Result<Vec<u8>, String> {
    let Some(rest) = data.strip_prefix("data:") else {
        return Ok(data.as_bytes().to_vec());
    };

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URL has no ',' separator".to_string())?;

    if header.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| format!("Base64 decode failed: {e}"))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}
