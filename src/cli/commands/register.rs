use anyhow::Context;
use std::io::{BufRead, Write};

use crate::config::Config;
use crate::services::{AuthService, SeaOrmAuthService};

fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn cmd_register(config: &Config, username: &str, email: &str) -> anyhow::Result<()> {
    let password = read_line("Password: ")?;
    let confirm_password = read_line("Confirm password: ")?;

    let store = super::open_store(config).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());

    let user = auth
        .register(username, email, &password, &confirm_password)
        .await?;

    println!("✓ Registered {} <{}> (id {})", user.username, user.email, user.id);
    Ok(())
}
