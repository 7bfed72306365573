use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::Supplier;

/// Environment variable that overrides `general.database_path`, so the
/// connection string can stay out of committed config files.
pub const DATABASE_URL_ENV: &str = "SUPPLIER_PORTAL_DATABASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub store: StoreConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub suppliers: SuppliersConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/portal.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

/// Connection pool settings for the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_connections: u32,

    pub min_connections: u32,

    /// How long a request waits to be handed a pooled connection.
    pub acquire_timeout_seconds: u64,

    pub connect_timeout_seconds: u64,

    /// Idle connections are closed after this many seconds.
    pub idle_timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_seconds: 5,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions are dropped after this many minutes without a request.
    pub session_inactivity_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            cors_allowed_origins: vec![
                "http://localhost:8501".to_string(),
                "http://127.0.0.1:8501".to_string(),
            ],
            secure_cookies: true,
            session_inactivity_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 19456 = 19MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 19 * 1024,
            argon2_time_cost: 2,
            argon2_parallelism: 1,
        }
    }
}

/// Filesystem inputs for one supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierConfig {
    pub images_path: String,

    /// Raw-data CSV imported into the CSV collection.
    pub csv_path: String,

    /// Precomputed clusters CSV, served read-only.
    pub clusters_path: String,

    /// CSV column joined against image filenames when searching.
    pub lookup_field: String,
}

impl SupplierConfig {
    fn with_root(root: &str) -> Self {
        Self {
            images_path: format!("{root}/images"),
            csv_path: format!("{root}/results/donnees_brutes.csv"),
            clusters_path: format!("{root}/results/clusters_groupes.csv"),
            lookup_field: "Nom du fichier".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppliersConfig {
    pub md_elektronik: SupplierConfig,

    pub rosenberger: SupplierConfig,
}

impl Default for SuppliersConfig {
    fn default() -> Self {
        Self {
            md_elektronik: SupplierConfig::with_root("data/md_elektronik"),
            rosenberger: SupplierConfig::with_root("data/rosenberger"),
        }
    }
}

impl SuppliersConfig {
    #[must_use]
    pub const fn get(&self, supplier: Supplier) -> &SupplierConfig {
        match supplier {
            Supplier::MdElektronik => &self.md_elektronik,
            Supplier::Rosenberger => &self.rosenberger,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            store: StoreConfig::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            suppliers: SuppliersConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        if let Ok(url) = std::env::var(DATABASE_URL_ENV)
            && !url.trim().is_empty()
        {
            config.general.database_path = url;
        }

        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("supplier-portal").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".supplier-portal").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.store.max_connections == 0
            || self.store.min_connections > self.store.max_connections
        {
            anyhow::bail!("Store pool must allow at least one connection and min <= max");
        }

        argon2::Params::new(
            self.security.argon2_memory_cost_kib,
            self.security.argon2_time_cost,
            self.security.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        for supplier in Supplier::ALL {
            if self.suppliers.get(supplier).lookup_field.trim().is_empty() {
                anyhow::bail!("Lookup field for {} cannot be empty", supplier.display_name());
            }
        }

        Ok(())
    }
}
