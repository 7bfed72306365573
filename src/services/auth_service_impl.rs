//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{LoginAttempt, Store, User};
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::password::{hash_password, verify_password};
use crate::services::validation::{ValidationError, validate_email, validate_password};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn record_attempt(&self, email: &str, success: bool) -> Result<(), AuthError> {
        self.store.record_login_attempt(email, success).await?;

        let outcome = if success { "success" } else { "failure" };
        metrics::counter!("login_attempts_total", "outcome" => outcome).increment(1);

        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError> {
        if !validate_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        validate_password(password)?;

        if password != confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        if self.store.count_users_with_email(email).await? > 0 {
            warn!(email = %email, "Email already registered, adding another account");
        }

        let password = password.to_string();
        let security = self.security.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password, &security))
                .await
                .map_err(|e| AuthError::Internal(e.to_string()))?
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = self.store.create_user(username, email, &password_hash).await?;

        info!(user_id = %user.id, email = %email, "User registered");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if !validate_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        let Some((user, password_hash)) = self.store.get_user_by_email_with_password(email).await?
        else {
            self.record_attempt(email, false).await?;
            warn!(email = %email, "Login failed: email not found");
            return Err(AuthError::EmailNotFound);
        };

        let password = password.to_string();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await
                .map_err(|e| AuthError::Internal(e.to_string()))?
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Stored password hash is malformed");
                    false
                });

        self.record_attempt(email, verified).await?;

        if verified {
            info!(user_id = %user.id, email = %email, "Login succeeded");
            Ok(user)
        } else {
            warn!(email = %email, "Login failed: incorrect password");
            Err(AuthError::IncorrectPassword)
        }
    }

    async fn check_login_attempts(&self, email: &str) -> Result<u64, AuthError> {
        Ok(self.store.failed_login_count(email).await?)
    }

    async fn recent_successful_logins(&self, limit: u64) -> Result<Vec<LoginAttempt>, AuthError> {
        Ok(self.store.recent_successful_logins(limit).await?)
    }
}
