//! Stateless extraction over posted report text.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::config::MAX_REPORT_BYTES;
use crate::models::ExtractionResult;
use crate::pipeline::bloodwork::extract_value_json;

/// `POST /api/extract` with body `{"text": "..."}`.
///
/// The body is taken as loose JSON so a non-string `text` reaches the
/// extractor and is reported as `INVALID_INPUT` rather than a parse failure.
pub async fn run(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let Json(payload) = payload?;
    let text = payload.get("text").unwrap_or(&Value::Null);

    if let Value::String(s) = text {
        if s.len() > MAX_REPORT_BYTES {
            return Err(ApiError::BadRequest(format!(
                "Report text exceeds {MAX_REPORT_BYTES} bytes"
            )));
        }
    }

    let result = extract_value_json(text).map_err(|e| {
        tracing::warn!(error = %e, "Extraction request rejected");
        ApiError::from(e)
    })?;
    Ok(Json(result))
}
