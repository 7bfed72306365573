use serde::{Deserialize, Serialize};

use crate::domain::{Page, Supplier};
use crate::services::FailedImport;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub logged_in: bool,
    pub user_email: Option<String>,
    pub page: Page,
}

#[derive(Debug, Serialize)]
pub struct SupplierDto {
    pub id: Supplier,
    pub name: &'static str,
    pub images_path: String,
    pub csv_path: String,
    pub clusters_path: String,
    pub lookup_field: String,
    pub clusters_available: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResultDto {
    pub message: String,
    pub imported: usize,
    pub replaced: u64,
    pub failed: Vec<FailedImport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearResultDto {
    pub message: String,
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct LoginHistoryDto {
    pub email: String,
    pub login_time: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}
