use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::validate_limit;
use super::{ApiError, ApiResponse, AppState, LimitQuery, LoginHistoryDto};

/// GET /history?limit=
/// Most recent successful logins, newest first.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<LoginHistoryDto>>>, ApiError> {
    let limit = validate_limit(query.limit)?;

    let attempts = state.auth().recent_successful_logins(limit).await?;

    let history = attempts
        .into_iter()
        .map(|attempt| LoginHistoryDto {
            email: attempt.email,
            login_time: attempt.login_time,
        })
        .collect();

    Ok(Json(ApiResponse::success(history)))
}
