//! Error handlers
//!
//! Converts errors into HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

use crate::api::responses::MessageResponse;
use crate::error::types::{ApiError, ErrorKind, RegistryError, StorageError};

/// Convert error kind to HTTP status code
pub fn error_to_status_code(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Conflict | ErrorKind::Invalid => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message returned to the client. Storage details stay in the server log.
pub fn client_message(err: &ApiError) -> String {
    match err {
        ApiError::BadRequest(msg) => msg.clone(),
        ApiError::Registry(registry_err) => match registry_err {
            RegistryError::DuplicateName(_) => "User with this name already exists".to_string(),
            RegistryError::FolderExists(_) => "A folder with this name already exists".to_string(),
            RegistryError::AccountNotFound(_) => "User not found".to_string(),
            RegistryError::InvalidName(e) => e.to_string(),
            RegistryError::Storage(e) => match e {
                StorageError::CreateFailed { .. } => "Failed to create user folder",
                StorageError::RemoveFailed { .. } => "Failed to delete user folder",
                StorageError::RenameFailed { .. } | StorageError::ListFailed { .. } => {
                    "Failed to rename user folder"
                }
            }
            .to_string(),
        },
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Registry(e) => error_to_status_code(e.kind()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = MessageResponse::new(client_message(&self));
        (status, Json(body)).into_response()
    }
}
