//! Domain service for bulk imports from the local filesystem.
//!
//! Each import replaces the whole collection it targets. Files are read and
//! parsed before the store is touched, so a failed import leaves the
//! previous snapshot in place.

use crate::services::validation::ValidationError;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors specific to the import process.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to parse CSV: {message}")]
    Parse {
        message: String,
        /// First raw lines of the file, when they could be read.
        sample: Option<String>,
    },

    #[error("Database error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ImportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

impl From<tokio::task::JoinError> for ImportError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A file that could not be read during an image import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImport {
    pub filename: String,
    pub error: String,
}

/// Outcome of one import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: Vec<FailedImport>,
    /// Records the previous snapshot held before being replaced.
    pub replaced: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Domain service trait for imports.
#[async_trait::async_trait]
pub trait ImportService: Send + Sync {
    /// Replaces the image collection with the png/jpg/jpeg files found
    /// directly inside `folder`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::NotFound`] if `folder` is not a directory.
    /// Unreadable files are listed in the report instead.
    async fn import_images(&self, folder: &Path) -> Result<ImportReport, ImportError>;

    /// Replaces the CSV collection with the rows of `file`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Validation`] if the file fails the structural
    /// check and [`ImportError::Parse`] if it cannot be parsed at all.
    async fn import_csv(&self, file: &Path) -> Result<ImportReport, ImportError>;

    async fn clear_images(&self) -> Result<u64, ImportError>;

    async fn clear_csv(&self) -> Result<u64, ImportError>;
}
