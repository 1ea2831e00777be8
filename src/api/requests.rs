//! Request bodies

use serde::Deserialize;

/// Body of `POST /create-account`
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
}

/// Body of `PATCH /update-folder/{user_id}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    pub new_name: String,
}
