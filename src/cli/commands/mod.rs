mod clusters;
mod history;
mod import;
mod register;

pub use clusters::cmd_clusters;
pub use history::cmd_history;
pub use import::{cmd_clear_csv, cmd_clear_images, cmd_import_csv, cmd_import_images};
pub use register::cmd_register;

use crate::config::Config;
use crate::db::Store;

async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::with_pool_options(&config.general.database_path, &config.store).await
}
