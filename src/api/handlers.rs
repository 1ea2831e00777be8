//! Request handlers
//!
//! Each handler unpacks the request, calls the registry and wraps the
//! result. Failures are turned into responses by `ApiError`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use log::info;
use std::sync::Arc;

use crate::api::requests::{CreateAccountRequest, UpdateFolderRequest};
use crate::api::responses::{
    ACCOUNT_DELETED, CreateAccountResponse, MessageResponse, UpdateFolderResponse,
};
use crate::error::{ApiError, RegistryError};
use crate::registry::{AccountId, AccountRegistry};

/// `POST /create-account`
pub async fn create_account(
    State(registry): State<Arc<AccountRegistry>>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Json<CreateAccountResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;

    let id = registry.create(&request.name).await?;
    info!("User ID created: {}", id);

    Ok(Json(CreateAccountResponse::new(id)))
}

/// `DELETE /delete-account/{user_id}`
pub async fn delete_account(
    State(registry): State<Arc<AccountRegistry>>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("User ID to delete: {}", user_id);

    let id = parse_account_id(&user_id)?;
    registry.delete(id).await?;

    Ok(Json(MessageResponse::new(ACCOUNT_DELETED)))
}

/// `PATCH /update-folder/{user_id}`
pub async fn update_folder(
    State(registry): State<Arc<AccountRegistry>>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateFolderRequest>, JsonRejection>,
) -> Result<Json<UpdateFolderResponse>, ApiError> {
    info!("User ID to update: {}", user_id);

    let id = parse_account_id(&user_id)?;
    let Json(request) = payload.map_err(reject_body)?;

    let new_folder_name = registry.rename(id, &request.new_name).await?;

    Ok(Json(UpdateFolderResponse::new(new_folder_name)))
}

/// Ids that are not well-formed can never match an account
fn parse_account_id(raw: &str) -> Result<AccountId, RegistryError> {
    raw.parse()
        .map_err(|_| RegistryError::AccountNotFound(raw.to_string()))
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}
