//! Domain service for registration, login and login history.
//!
//! Failed attempts are counted per email but never used to block a login.

use crate::db::{LoginAttempt, User};
use crate::services::validation::ValidationError;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Email not found.")]
    EmailNotFound,

    #[error("Incorrect password.")]
    IncorrectPassword,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a user after checking, in order: email format, password
    /// strength, confirmation. Duplicate emails are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for the first failing check.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError>;

    /// Verifies credentials. Every attempt with a well-formed email is
    /// recorded, whatever its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailNotFound`] or [`AuthError::IncorrectPassword`]
    /// when login fails.
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Number of failed attempts recorded for `email`.
    async fn check_login_attempts(&self, email: &str) -> Result<u64, AuthError>;

    /// Successful attempts, newest first.
    async fn recent_successful_logins(&self, limit: u64) -> Result<Vec<LoginAttempt>, AuthError>;
}
