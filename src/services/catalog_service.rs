//! Read-side lookups over the image and CSV collections.

use crate::db::{CsvRecord, ImageRecord};
use crate::domain::Supplier;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("Invalid image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Joint lookup result for one file name.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub supplier: Supplier,
    pub filename: String,
    pub lookup_field: String,
    pub image: Option<ImageRecord>,
    pub rows: Vec<CsvRecord>,
}

/// Decodes a stored base64 payload back into image bytes.
pub fn decode_image(data: &str) -> Result<Vec<u8>, CatalogError> {
    Ok(STANDARD.decode(data)?)
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn find_image(&self, filename: &str) -> Result<Option<ImageRecord>, CatalogError>;

    /// Decoded bytes of the image stored under `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ImageNotFound`] when no such image exists and
    /// [`CatalogError::Decode`] when its payload is not valid base64.
    async fn image_bytes(&self, filename: &str) -> Result<Vec<u8>, CatalogError>;

    async fn find_csv_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<CsvRecord>, CatalogError>;

    async fn list_images(&self) -> Result<Vec<ImageRecord>, CatalogError>;

    async fn list_csv(&self) -> Result<Vec<CsvRecord>, CatalogError>;

    /// Image and CSV rows for `filename`, using the supplier's lookup field.
    async fn search(&self, supplier: Supplier, filename: &str)
    -> Result<SearchResult, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_image() {
        assert_eq!(decode_image("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_image("").unwrap(), Vec::<u8>::new());
        assert!(matches!(
            decode_image("not base64!"),
            Err(CatalogError::Decode(_))
        ));
    }
}
