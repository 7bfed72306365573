pub mod password;
pub mod validation;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod import_service;
pub mod import_service_impl;
pub use import_service::{FailedImport, ImportError, ImportReport, ImportService};
pub use import_service_impl::DefaultImportService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService, SearchResult};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod clusters;
pub use clusters::{ClusterDownload, ClusterError, ClusterService, ClusterTable};
