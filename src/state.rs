use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, ClusterService, DefaultImportService, ImportService,
    SeaOrmAuthService, SeaOrmCatalogService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub import_service: Arc<dyn ImportService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub cluster_service: Arc<ClusterService>,
}

impl SharedState {
    /// Connects to the store, verifies it answers, and wires the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(&config.general.database_path, &config.store)
            .await
            .context("Failed to connect to the document store")?;

        store
            .ping()
            .await
            .context("Document store did not answer the startup ping")?;
        info!("Document store is reachable");

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let import_service = Arc::new(DefaultImportService::new(store.clone()))
            as Arc<dyn ImportService + Send + Sync + 'static>;

        let catalog_service = Arc::new(SeaOrmCatalogService::new(
            store.clone(),
            config.suppliers.clone(),
        )) as Arc<dyn CatalogService + Send + Sync + 'static>;

        let cluster_service = Arc::new(ClusterService::new(config.suppliers.clone()));

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            import_service,
            catalog_service,
            cluster_service,
        }
    }
}
