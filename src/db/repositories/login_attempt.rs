use crate::entities::{login_attempts, prelude::*};
use anyhow::Result;
use chrono::SecondsFormat;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub use crate::entities::login_attempts::Model as LoginAttempt;

pub struct LoginAttemptRepository {
    conn: DatabaseConnection,
}

impl LoginAttemptRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, email: &str, success: bool) -> Result<LoginAttempt> {
        let active_model = login_attempts::ActiveModel {
            email: Set(email.to_string()),
            success: Set(success),
            login_time: Set(chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
            ..Default::default()
        };

        let attempt = LoginAttempts::insert(active_model)
            .exec_with_returning(&self.conn)
            .await?;

        Ok(attempt)
    }

    pub async fn failed_count(&self, email: &str) -> Result<u64> {
        let count = LoginAttempts::find()
            .filter(login_attempts::Column::Email.eq(email))
            .filter(login_attempts::Column::Success.eq(false))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    pub async fn recent_successful(&self, limit: u64) -> Result<Vec<LoginAttempt>> {
        let attempts = LoginAttempts::find()
            .filter(login_attempts::Column::Success.eq(true))
            .order_by_desc(login_attempts::Column::LoginTime)
            .order_by_desc(login_attempts::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(attempts)
    }
}
