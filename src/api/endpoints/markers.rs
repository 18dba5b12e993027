//! Stored marker history per user.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::MarkerRecord;

/// `GET /api/users/:user_id/markers`: records, newest first.
pub async fn history(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<MarkerRecord>>, ApiError> {
    Ok(Json(ctx.processor.history(&user_id)?))
}

/// `GET /api/users/:user_id/markers/latest`
pub async fn latest(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<MarkerRecord>, ApiError> {
    ctx.processor
        .latest(&user_id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No marker records for user {user_id}")))
}
