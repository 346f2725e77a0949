use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use super::error::ApiError;
use super::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match check_api_key(provided, &state.api_keys) {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// With no keys configured every non-empty key is accepted.
pub fn check_api_key(provided: Option<&str>, valid_keys: &[String]) -> Result<(), ApiError> {
    let key = match provided {
        Some(k) if !k.is_empty() => k,
        _ => return Err(ApiError::MissingApiKey),
    };

    if valid_keys.is_empty() {
        warn!("No API keys configured - running in development mode");
        return Ok(());
    }

    if valid_keys.iter().any(|k| k == key) {
        Ok(())
    } else {
        Err(ApiError::InvalidApiKey)
    }
}
