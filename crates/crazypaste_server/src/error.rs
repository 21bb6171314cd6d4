//! Mapping of core errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crazypaste_core::AppError;
use serde_json::json;

/// Handler error wrapper rendering [`AppError`] as a JSON `{ "error": ... }` body.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl HttpError {
    /// Status code and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Paste not found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PasswordRequired => {
                (StatusCode::UNAUTHORIZED, "Password required".to_string())
            }
            AppError::InvalidPassword => (StatusCode::FORBIDDEN, "Invalid password".to_string()),
            AppError::Locked(msg) => (StatusCode::LOCKED, msg.clone()),
            AppError::Database(_) | AppError::StorageMessage(_) | AppError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.0.is_storage_failure() {
            tracing::error!("Storage error: {}", self.0);
        }
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
