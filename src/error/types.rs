//! Error types
//!
//! Defines domain-specific error types for each layer of the server.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage module errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateFailed { path: PathBuf, source: io::Error },

    #[error("Failed to remove directory {}: {source}", .path.display())]
    RemoveFailed { path: PathBuf, source: io::Error },

    #[error("Failed to rename {} to {}: {source}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Failed to list directory {}: {source}", .path.display())]
    ListFailed { path: PathBuf, source: io::Error },
}

/// Display name validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name is too long ({length} bytes, max {max})")]
    TooLong { length: usize, max: usize },

    #[error("Name cannot be '.' or '..'")]
    Reserved,

    #[error("Name contains a forbidden character: {0:?}")]
    ForbiddenCharacter(char),
}

/// Broad classification used to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    NotFound,
    Invalid,
    Storage,
}

/// Account registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("User with name '{0}' already exists")]
    DuplicateName(String),

    #[error("A folder starting with '{0}' already exists")]
    FolderExists(String),

    #[error("User not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::DuplicateName(_) | RegistryError::FolderExists(_) => {
                ErrorKind::Conflict
            }
            RegistryError::AccountNotFound(_) => ErrorKind::NotFound,
            RegistryError::InvalidName(_) => ErrorKind::Invalid,
            RegistryError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Fatal startup errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("Failed to prepare storage root {}: {source}", .path.display())]
    StorageRoot { path: PathBuf, source: io::Error },

    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}
