//! Per-browser session state and page navigation.

use axum::{Json, extract::State};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, SessionDto};
use crate::domain::{NavAction, SessionState};

pub async fn load_state(session: &Session) -> Result<SessionState, ApiError> {
    session
        .get::<SessionState>(SessionState::KEY)
        .await
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::internal(format!("Failed to read session: {e}")))
}

pub async fn save_state(session: &Session, state: &SessionState) -> Result<(), ApiError> {
    session
        .insert(SessionState::KEY, state)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to write session: {e}")))
}

impl From<&SessionState> for SessionDto {
    fn from(state: &SessionState) -> Self {
        Self {
            logged_in: state.logged_in,
            user_email: state.user_email.clone(),
            page: state.page(),
        }
    }
}

/// GET /session
pub async fn get_session(
    State(_state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    let state = load_state(&session).await?;
    Ok(Json(ApiResponse::success(SessionDto::from(&state))))
}

/// POST /session/navigate
pub async fn navigate(
    State(_state): State<Arc<AppState>>,
    session: Session,
    Json(action): Json<NavAction>,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    let mut state = load_state(&session).await?;
    let page = state.navigate(action);
    save_state(&session, &state).await?;

    tracing::debug!(?action, ?page, "Session navigated");
    Ok(Json(ApiResponse::success(SessionDto::from(&state))))
}
