use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ClearResultDto};
use crate::db::ImageRecord;

/// GET /images
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ImageRecord>>>, ApiError> {
    let images = state.shared.catalog_service.list_images().await?;
    Ok(Json(ApiResponse::success(images)))
}

/// GET /images/{filename}
/// Serves the decoded image with a content type guessed from its name.
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.shared.catalog_service.image_bytes(&filename).await?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.as_ref().to_string())], bytes).into_response())
}

/// DELETE /images
pub async fn clear_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ClearResultDto>>, ApiError> {
    let deleted = state.shared.import_service.clear_images().await?;

    Ok(Json(ApiResponse::success(ClearResultDto {
        message: format!("Deleted {deleted} images!"),
        deleted,
    })))
}
