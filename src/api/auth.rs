use axum::{
    Json,
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::session::{load_state, save_state};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::{NavAction, Page};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub username: String,
    pub email: String,
    pub page: Page,
}

#[derive(Deserialize)]
pub struct AttemptsQuery {
    pub email: String,
}

#[derive(Serialize)]
pub struct AttemptsResponse {
    pub email: String,
    pub failed_attempts: u64,
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests whose session is not logged in.
pub async fn auth_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let state = load_state(&session).await?;

    if !state.logged_in {
        return Err(ApiError::unauthorized());
    }

    if let Some(email) = state.user_email.as_deref() {
        tracing::Span::current().record("user_id", email);
    }

    Ok(next.run(request).await.into_response())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let user = state
        .auth()
        .register(
            &payload.username,
            &payload.email,
            &payload.password,
            &payload.confirm_password,
        )
        .await?;

    let mut session_state = load_state(&session).await?;
    let page = session_state.navigate(NavAction::Registered);
    save_state(&session, &session_state).await?;

    Ok(Json(ApiResponse::success(AuthResponse {
        message: "Registration successful! Please login.".to_string(),
        username: user.username,
        email: user.email,
        page,
    })))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let user = state.auth().login(&payload.email, &payload.password).await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    let mut session_state = load_state(&session).await?;
    let page = session_state.log_in(user.email.clone());
    save_state(&session, &session_state).await?;

    Ok(Json(ApiResponse::success(AuthResponse {
        message: "Login successful!".to_string(),
        username: user.username,
        email: user.email,
        page,
    })))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse<Page>>, ApiError> {
    let mut session_state = load_state(&session).await?;
    let page = session_state.log_out();

    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to end session: {e}")))?;

    Ok(Json(ApiResponse::success(page)))
}

/// GET /auth/attempts?email=
pub async fn failed_attempts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AttemptsQuery>,
) -> Result<Json<ApiResponse<AttemptsResponse>>, ApiError> {
    let failed_attempts = state.auth().check_login_attempts(&query.email).await?;

    Ok(Json(ApiResponse::success(AttemptsResponse {
        email: query.email,
        failed_attempts,
    })))
}
