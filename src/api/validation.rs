use super::ApiError;
use crate::constants::limits::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use crate::domain::Supplier;

pub fn validate_limit(limit: Option<u64>) -> Result<u64, ApiError> {
    const MIN_LIMIT: u64 = 1;

    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(MIN_LIMIT..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_HISTORY_LIMIT}"
        )));
    }
    Ok(limit)
}

pub fn parse_supplier(raw: &str) -> Result<Supplier, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found("Supplier", raw))
}

pub fn validate_filename(filename: &str) -> Result<&str, ApiError> {
    let trimmed = filename.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("File name cannot be empty"));
    }
    Ok(trimmed)
}
