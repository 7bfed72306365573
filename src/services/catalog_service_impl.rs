//! `SeaORM` implementation of the `CatalogService` trait.

use crate::config::SuppliersConfig;
use crate::db::{CsvRecord, ImageRecord, Store};
use crate::domain::Supplier;
use crate::services::catalog_service::{CatalogError, CatalogService, SearchResult, decode_image};
use async_trait::async_trait;
use tracing::debug;

pub struct SeaOrmCatalogService {
    store: Store,
    suppliers: SuppliersConfig,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store, suppliers: SuppliersConfig) -> Self {
        Self { store, suppliers }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn find_image(&self, filename: &str) -> Result<Option<ImageRecord>, CatalogError> {
        Ok(self.store.find_image(filename).await?)
    }

    async fn image_bytes(&self, filename: &str) -> Result<Vec<u8>, CatalogError> {
        let image = self
            .store
            .find_image(filename)
            .await?
            .ok_or_else(|| CatalogError::ImageNotFound(filename.to_string()))?;

        decode_image(&image.data)
    }

    async fn find_csv_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<CsvRecord>, CatalogError> {
        Ok(self.store.find_csv_by_field(field, value).await?)
    }

    async fn list_images(&self) -> Result<Vec<ImageRecord>, CatalogError> {
        Ok(self.store.list_images().await?)
    }

    async fn list_csv(&self) -> Result<Vec<CsvRecord>, CatalogError> {
        Ok(self.store.list_csv_records().await?)
    }

    async fn search(
        &self,
        supplier: Supplier,
        filename: &str,
    ) -> Result<SearchResult, CatalogError> {
        let lookup_field = self.suppliers.get(supplier).lookup_field.clone();

        let image = self.store.find_image(filename).await?;
        let rows = self.store.find_csv_by_field(&lookup_field, filename).await?;

        debug!(
            supplier = %supplier.slug(),
            filename,
            image_found = image.is_some(),
            rows = rows.len(),
            "Search completed"
        );

        Ok(SearchResult {
            supplier,
            filename: filename.to_string(),
            lookup_field,
            image,
            rows,
        })
    }
}
