use crate::config::Config;
use crate::services::{AuthService, SeaOrmAuthService};

pub async fn cmd_history(config: &Config, limit: u64) -> anyhow::Result<()> {
    let store = super::open_store(config).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());
    let logins = auth.recent_successful_logins(limit).await?;

    if logins.is_empty() {
        println!("No login history found.");
        return Ok(());
    }

    println!("Recent Logins (last {}):", logins.len());
    println!("{:-<70}", "");

    for login in logins {
        println!("• {}  {}", login.login_time, login.email);
    }

    Ok(())
}
