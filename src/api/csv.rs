use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ClearResultDto};
use crate::db::CsvRecord;

/// GET /csv
pub async fn list_csv(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CsvRecord>>>, ApiError> {
    let records = state.shared.catalog_service.list_csv().await?;
    Ok(Json(ApiResponse::success(records)))
}

/// DELETE /csv
pub async fn clear_csv(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ClearResultDto>>, ApiError> {
    let deleted = state.shared.import_service.clear_csv().await?;

    Ok(Json(ApiResponse::success(ClearResultDto {
        message: format!("Deleted {deleted} CSV records!"),
        deleted,
    })))
}
