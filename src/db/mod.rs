use crate::config::StoreConfig;
use crate::parser::csv::CsvRow;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::csv_record::CsvRecord;
pub use repositories::image::{ImageRecord, ReplaceOutcome};
pub use repositories::login_attempt::LoginAttempt;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, &StoreConfig::default()).await
    }

    pub async fn with_pool_options(db_url: &str, options: &StoreConfig) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path) = sqlite_file_path(db_url) {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            if !path.exists() {
                std::fs::File::create(path)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(options.max_connections)
            .min_connections(options.min_connections)
            .connect_timeout(Duration::from_secs(options.connect_timeout_seconds))
            .acquire_timeout(Duration::from_secs(options.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(options.idle_timeout_seconds))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            options.min_connections, options.max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn login_attempt_repo(&self) -> repositories::login_attempt::LoginAttemptRepository {
        repositories::login_attempt::LoginAttemptRepository::new(self.conn.clone())
    }

    fn image_repo(&self) -> repositories::image::ImageRepository {
        repositories::image::ImageRepository::new(self.conn.clone())
    }

    fn csv_repo(&self) -> repositories::csv_record::CsvRecordRepository {
        repositories::csv_record::CsvRecordRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        self.user_repo().create(username, email, password_hash).await
    }

    pub async fn get_user_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn count_users_with_email(&self, email: &str) -> Result<u64> {
        self.user_repo().count_by_email(email).await
    }

    // ========== Login attempts ==========

    pub async fn record_login_attempt(&self, email: &str, success: bool) -> Result<LoginAttempt> {
        self.login_attempt_repo().record(email, success).await
    }

    pub async fn failed_login_count(&self, email: &str) -> Result<u64> {
        self.login_attempt_repo().failed_count(email).await
    }

    pub async fn recent_successful_logins(&self, limit: u64) -> Result<Vec<LoginAttempt>> {
        self.login_attempt_repo().recent_successful(limit).await
    }

    // ========== Images ==========

    pub async fn replace_images(&self, images: Vec<ImageRecord>) -> Result<ReplaceOutcome> {
        self.image_repo().replace_all(images).await
    }

    pub async fn clear_images(&self) -> Result<u64> {
        self.image_repo().clear().await
    }

    pub async fn find_image(&self, filename: &str) -> Result<Option<ImageRecord>> {
        self.image_repo().find_by_filename(filename).await
    }

    pub async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        self.image_repo().list().await
    }

    pub async fn image_count(&self) -> Result<u64> {
        self.image_repo().count().await
    }

    // ========== CSV records ==========

    pub async fn replace_csv_records(&self, rows: &[CsvRow]) -> Result<ReplaceOutcome> {
        self.csv_repo().replace_all(rows).await
    }

    pub async fn clear_csv_records(&self) -> Result<u64> {
        self.csv_repo().clear().await
    }

    pub async fn list_csv_records(&self) -> Result<Vec<CsvRecord>> {
        self.csv_repo().list().await
    }

    pub async fn find_csv_by_field(&self, field: &str, value: &str) -> Result<Vec<CsvRecord>> {
        self.csv_repo().find_by_field(field, value).await
    }

    pub async fn csv_record_count(&self) -> Result<u64> {
        self.csv_repo().count().await
    }
}

/// On-disk path for a `sqlite:` URL, or `None` for in-memory databases.
fn sqlite_file_path(db_url: &str) -> Option<&Path> {
    let rest = db_url.strip_prefix("sqlite:")?;
    let rest = rest.trim_start_matches("//");
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    async fn temp_store() -> Store {
        let path = std::env::temp_dir().join(format!("portal-store-{}.db", uuid::Uuid::new_v4()));
        Store::new(&format!("sqlite:{}", path.display())).await.unwrap()
    }

    fn row(value: Value) -> CsvRow {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite:data/portal.db"),
            Some(Path::new("data/portal.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite://data/portal.db?mode=rwc"),
            Some(Path::new("data/portal.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn test_replace_images_is_full_replace() {
        let store = temp_store().await;

        let first = vec![
            ImageRecord {
                filename: "a.png".into(),
                data: "AAAA".into(),
            },
            ImageRecord {
                filename: "b.png".into(),
                data: "BBBB".into(),
            },
        ];
        let outcome = store.replace_images(first).await.unwrap();
        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.deleted, 0);

        let second = vec![ImageRecord {
            filename: "c.jpg".into(),
            data: "CCCC".into(),
        }];
        let outcome = store.replace_images(second).await.unwrap();
        assert_eq!(outcome.deleted, 2);
        assert_eq!(store.image_count().await.unwrap(), 1);
        assert!(store.find_image("a.png").await.unwrap().is_none());
        assert_eq!(store.find_image("c.jpg").await.unwrap().unwrap().data, "CCCC");

        assert_eq!(store.clear_images().await.unwrap(), 1);
        assert!(store.find_image("c.jpg").await.unwrap().is_none());
        assert_eq!(store.clear_images().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_csv_by_field_with_spaces_in_key() {
        let store = temp_store().await;

        let rows = vec![
            row(json!({"Nom du fichier": "img_01.png", "Cluster": "3"})),
            row(json!({"Nom du fichier": "img_02.png", "Cluster": null})),
            row(json!({"Nom du fichier": "img_01.png", "Cluster": "5"})),
        ];
        store.replace_csv_records(&rows).await.unwrap();

        let hits = store
            .find_csv_by_field("Nom du fichier", "img_01.png")
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].fields["Cluster"], "3");
        assert_eq!(hits[1].fields["Cluster"], "5");

        assert!(
            store
                .find_csv_by_field("Nom du fichier", "missing.png")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_csv_records_keep_column_order() {
        let store = temp_store().await;
        store
            .replace_csv_records(&[row(json!({"z": "1", "a": "2", "m": null}))])
            .await
            .unwrap();

        let records = store.list_csv_records().await.unwrap();
        let keys: Vec<&String> = records[0].fields.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[tokio::test]
    async fn test_login_attempts() {
        let store = temp_store().await;

        store.record_login_attempt("a@b.co", false).await.unwrap();
        store.record_login_attempt("a@b.co", true).await.unwrap();
        store.record_login_attempt("c@d.co", true).await.unwrap();

        assert_eq!(store.failed_login_count("a@b.co").await.unwrap(), 1);
        assert_eq!(store.failed_login_count("c@d.co").await.unwrap(), 0);

        let recent = store.recent_successful_logins(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].email, "c@d.co");
        assert!(recent.iter().all(|attempt| attempt.success));

        assert_eq!(store.recent_successful_logins(1).await.unwrap().len(), 1);
    }
}
