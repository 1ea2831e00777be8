//! File system operations
//!
//! Directory primitives used by the account registry. All calls go through
//! `tokio::fs` so a slow disk only stalls the request that touched it.

use log::{debug, warn};
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

use crate::error::StorageError;

const REMOVE_RETRIES: u32 = 3;

/// Create a directory, including any missing parents
pub async fn create_directory(path: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| StorageError::CreateFailed {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Created directory {}", path.display());
    Ok(())
}

/// Remove a directory tree. A directory that is already gone counts as removed.
pub async fn remove_directory(path: &Path) -> Result<(), StorageError> {
    let mut attempt = 1;
    loop {
        match fs::remove_dir_all(path).await {
            Ok(()) => {
                debug!("Removed directory {}", path.display());
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Directory {} already absent", path.display());
                return Ok(());
            }
            Err(e) if should_retry_remove(&e, attempt) => {
                warn!(
                    "Permission denied removing {} (attempt {}/{}), retrying",
                    path.display(),
                    attempt,
                    REMOVE_RETRIES
                );
                tokio::time::sleep(Duration::from_millis(100 * u64::from(attempt))).await;
                attempt += 1;
            }
            Err(source) => {
                return Err(StorageError::RemoveFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }
}

/// Only permission errors are transient, and only until the last attempt
fn should_retry_remove(err: &io::Error, attempt: u32) -> bool {
    attempt < REMOVE_RETRIES && err.kind() == io::ErrorKind::PermissionDenied
}

/// Move a directory to a new path. Fails if the destination already exists.
pub async fn rename_directory(from: &Path, to: &Path) -> Result<(), StorageError> {
    let rename_failed = |source| StorageError::RenameFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    // fs::rename silently replaces an empty destination directory on unix
    if fs::try_exists(to).await.map_err(rename_failed)? {
        return Err(rename_failed(io::Error::from(io::ErrorKind::AlreadyExists)));
    }

    fs::rename(from, to).await.map_err(rename_failed)?;

    debug!("Renamed {} to {}", from.display(), to.display());
    Ok(())
}

/// Whether any entry directly under `dir` has a name starting with `prefix`
pub async fn any_entry_starts_with(dir: &Path, prefix: &str) -> Result<bool, StorageError> {
    let list_failed = |source| StorageError::ListFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(list_failed)?;
    while let Some(entry) = entries.next_entry().await.map_err(list_failed)? {
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            return Ok(true);
        }
    }

    Ok(false)
}
