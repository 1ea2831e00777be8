//! Response bodies
//!
//! Every response carries a human readable `message`.

use serde::Serialize;

use crate::registry::AccountId;

pub const ACCOUNT_CREATED: &str = "User folder created";
pub const ACCOUNT_DELETED: &str = "User folder deleted";
pub const FOLDER_RENAMED: &str = "User folder renamed";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    pub message: String,
    pub user_id: String,
}

impl CreateAccountResponse {
    pub fn new(id: AccountId) -> Self {
        Self {
            message: ACCOUNT_CREATED.to_string(),
            user_id: id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderResponse {
    pub message: String,
    pub new_folder_name: String,
}

impl UpdateFolderResponse {
    pub fn new(new_folder_name: String) -> Self {
        Self {
            message: FOLDER_RENAMED.to_string(),
            new_folder_name,
        }
    }
}
