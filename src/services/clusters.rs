use crate::config::SuppliersConfig;
use crate::domain::Supplier;
use crate::parser::csv::{CsvRow, TextEncoding, parse_bytes};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Clusters file not found: {0}")]
    NotFound(String),

    #[error("Failed to read clusters file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse clusters file: {0}")]
    Parse(String),
}

/// A supplier's precomputed clusters, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterTable {
    pub supplier: Supplier,
    pub path: String,
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
    pub encoding: TextEncoding,
}

#[derive(Debug, Clone)]
pub struct ClusterDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Serves each supplier's clusters CSV read-only. Nothing is cached; the
/// file is re-read on every call.
pub struct ClusterService {
    suppliers: SuppliersConfig,
}

impl ClusterService {
    #[must_use]
    pub const fn new(suppliers: SuppliersConfig) -> Self {
        Self { suppliers }
    }

    fn existing_path(&self, supplier: Supplier) -> Result<PathBuf, ClusterError> {
        let path = PathBuf::from(&self.suppliers.get(supplier).clusters_path);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ClusterError::NotFound(path.display().to_string()))
        }
    }

    pub async fn clusters_table(&self, supplier: Supplier) -> Result<ClusterTable, ClusterError> {
        let path = self.existing_path(supplier)?;
        let bytes = tokio::fs::read(&path).await?;

        let table = tokio::task::spawn_blocking(move || parse_bytes(&bytes))
            .await
            .map_err(|e| ClusterError::Parse(e.to_string()))?
            .map_err(|e| ClusterError::Parse(e.to_string()))?;

        debug!(supplier = %supplier.slug(), rows = table.rows.len(), "Clusters loaded");

        Ok(ClusterTable {
            supplier,
            path: path.display().to_string(),
            headers: table.headers,
            rows: table.rows,
            encoding: table.encoding,
        })
    }

    pub async fn clusters_download(
        &self,
        supplier: Supplier,
    ) -> Result<ClusterDownload, ClusterError> {
        let path = self.existing_path(supplier)?;
        let bytes = tokio::fs::read(&path).await?;

        Ok(ClusterDownload {
            file_name: supplier.clusters_download_name(),
            bytes,
        })
    }
}
