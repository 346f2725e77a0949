use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::ReplyError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing API key. Include 'X-API-Key' header.")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error(transparent)]
    Reply(#[from] ReplyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey => StatusCode::UNAUTHORIZED,
            ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
            ApiError::Reply(ReplyError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Reply(ReplyError::Provider(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Reply(ReplyError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
