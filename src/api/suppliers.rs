//! Per-supplier actions: imports, search and cluster results.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::path::Path as FsPath;
use std::sync::Arc;

use super::validation::{parse_supplier, validate_filename};
use super::{ApiError, ApiResponse, AppState, ImportResultDto, SupplierDto};
use crate::domain::Supplier;
use crate::services::{ClusterTable, ImportReport, SearchResult};

#[derive(Deserialize)]
pub struct SearchQuery {
    pub filename: String,
}

fn import_result(report: ImportReport, noun: &str) -> ImportResultDto {
    let message = format!("Successfully imported {} {noun}!", report.imported);
    ImportResultDto {
        message,
        imported: report.imported,
        replaced: report.replaced,
        failed: report.failed,
        warning: report.warning,
    }
}

/// GET /suppliers
pub async fn list_suppliers(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<SupplierDto>>> {
    let suppliers = Supplier::ALL
        .into_iter()
        .map(|supplier| {
            let config = state.config().suppliers.get(supplier);
            SupplierDto {
                id: supplier,
                name: supplier.display_name(),
                images_path: config.images_path.clone(),
                csv_path: config.csv_path.clone(),
                clusters_path: config.clusters_path.clone(),
                lookup_field: config.lookup_field.clone(),
                clusters_available: FsPath::new(&config.clusters_path).is_file(),
            }
        })
        .collect();

    Json(ApiResponse::success(suppliers))
}

/// POST /suppliers/{supplier}/images/import
pub async fn import_images(
    State(state): State<Arc<AppState>>,
    Path(supplier): Path<String>,
) -> Result<Json<ApiResponse<ImportResultDto>>, ApiError> {
    let supplier = parse_supplier(&supplier)?;
    let folder = state.config().suppliers.get(supplier).images_path.clone();

    let report = state
        .shared
        .import_service
        .import_images(FsPath::new(&folder))
        .await?;

    Ok(Json(ApiResponse::success(import_result(report, "images"))))
}

/// POST /suppliers/{supplier}/csv/import
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    Path(supplier): Path<String>,
) -> Result<Json<ApiResponse<ImportResultDto>>, ApiError> {
    let supplier = parse_supplier(&supplier)?;
    let file = state.config().suppliers.get(supplier).csv_path.clone();

    let report = state
        .shared
        .import_service
        .import_csv(FsPath::new(&file))
        .await?;

    Ok(Json(ApiResponse::success(import_result(report, "records"))))
}

/// GET /suppliers/{supplier}/search?filename=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(supplier): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let supplier = parse_supplier(&supplier)?;
    let filename = validate_filename(&query.filename)?;

    let result = state.shared.catalog_service.search(supplier, filename).await?;

    Ok(Json(ApiResponse::success(result)))
}

/// GET /suppliers/{supplier}/clusters
pub async fn clusters(
    State(state): State<Arc<AppState>>,
    Path(supplier): Path<String>,
) -> Result<Json<ApiResponse<ClusterTable>>, ApiError> {
    let supplier = parse_supplier(&supplier)?;
    let table = state.shared.cluster_service.clusters_table(supplier).await?;

    Ok(Json(ApiResponse::success(table)))
}

/// GET /suppliers/{supplier}/clusters/download
pub async fn download_clusters(
    State(state): State<Arc<AppState>>,
    Path(supplier): Path<String>,
) -> Result<Response, ApiError> {
    let supplier = parse_supplier(&supplier)?;
    let download = state
        .shared
        .cluster_service
        .clusters_download(supplier)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", download.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}
