//! Account-folder registry
//!
//! Owns every account record and keeps it in step with its directory under
//! the storage root. Each operation holds the registry lock for its whole
//! check-then-act sequence, and memory is only updated after the filesystem
//! change has succeeded.

use log::{error, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::config::{NamePolicy, ServerConfig};
use crate::error::RegistryError;
use crate::registry::account::{Account, AccountId};
use crate::storage::filesystem;
use crate::storage::{generate_folder_name, validate_display_name};

pub struct AccountRegistry {
    storage_root: PathBuf,
    name_policy: NamePolicy,
    max_name_length: usize,
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl AccountRegistry {
    pub fn new(storage_root: PathBuf, name_policy: NamePolicy, max_name_length: usize) -> Self {
        Self {
            storage_root,
            name_policy,
            max_name_length,
            accounts: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.storage_root_path(),
            config.name_policy,
            config.max_name_length,
        )
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Create an account and its folder, returning the new account id
    pub async fn create(&self, display_name: &str) -> Result<AccountId, RegistryError> {
        validate_display_name(display_name, self.max_name_length)?;

        let mut accounts = self.accounts.lock().await;

        if accounts.values().any(|a| a.display_name() == display_name) {
            return Err(RegistryError::DuplicateName(display_name.to_string()));
        }

        if self.name_policy == NamePolicy::Strict {
            self.ensure_no_folder_prefix(display_name).await?;
        }

        let mut id = AccountId::generate();
        while accounts.contains_key(&id) {
            id = AccountId::generate();
        }

        let folder_name = generate_folder_name(display_name);
        let folder_path = self.folder_path(&folder_name);

        if let Err(e) = filesystem::create_directory(&folder_path).await {
            error!("Failed to create folder for '{}': {}", display_name, e);
            return Err(e.into());
        }

        accounts.insert(
            id,
            Account::new(id, display_name.to_string(), folder_name.clone()),
        );

        info!(
            "Created account {} with folder {} ({} accounts)",
            id,
            folder_name,
            accounts.len()
        );

        Ok(id)
    }

    /// Delete an account and its folder tree
    pub async fn delete(&self, id: AccountId) -> Result<(), RegistryError> {
        let mut accounts = self.accounts.lock().await;

        let folder_name = match accounts.get(&id) {
            Some(account) => account.folder_name().to_string(),
            None => return Err(RegistryError::AccountNotFound(id.to_string())),
        };

        if let Err(e) = filesystem::remove_directory(&self.folder_path(&folder_name)).await {
            error!("Failed to delete folder for account {}: {}", id, e);
            return Err(e.into());
        }

        accounts.remove(&id);

        info!(
            "Deleted account {} and folder {} ({} accounts)",
            id,
            folder_name,
            accounts.len()
        );

        Ok(())
    }

    /// Move an account to a freshly named folder, returning the new folder name
    pub async fn rename(
        &self,
        id: AccountId,
        new_display_name: &str,
    ) -> Result<String, RegistryError> {
        let mut accounts = self.accounts.lock().await;

        if !accounts.contains_key(&id) {
            return Err(RegistryError::AccountNotFound(id.to_string()));
        }

        validate_display_name(new_display_name, self.max_name_length)?;

        self.ensure_no_folder_prefix(new_display_name).await?;

        if self.name_policy == NamePolicy::Strict
            && accounts
                .values()
                .any(|a| a.id() != id && a.display_name() == new_display_name)
        {
            return Err(RegistryError::DuplicateName(new_display_name.to_string()));
        }

        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| RegistryError::AccountNotFound(id.to_string()))?;

        let new_folder_name = generate_folder_name(new_display_name);
        let old_path = self.folder_path(account.folder_name());
        let new_path = self.folder_path(&new_folder_name);

        if let Err(e) = filesystem::rename_directory(&old_path, &new_path).await {
            error!("Failed to rename folder for account {}: {}", id, e);
            return Err(e.into());
        }

        info!(
            "Renamed folder of account {} from {} to {}",
            id,
            account.folder_name(),
            new_folder_name
        );

        account.set_folder_name(new_folder_name.clone());

        Ok(new_folder_name)
    }

    /// Snapshot of a live account
    pub async fn get(&self, id: AccountId) -> Option<Account> {
        self.accounts.lock().await.get(&id).cloned()
    }

    /// Number of live accounts
    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn folder_path(&self, folder_name: &str) -> PathBuf {
        self.storage_root.join(folder_name)
    }

    async fn ensure_no_folder_prefix(&self, name: &str) -> Result<(), RegistryError> {
        if filesystem::any_entry_starts_with(&self.storage_root, name).await? {
            return Err(RegistryError::FolderExists(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, NameError};
    use std::fs;
    use tempfile::TempDir;

    fn registry(root: &TempDir) -> AccountRegistry {
        AccountRegistry::new(root.path().to_path_buf(), NamePolicy::Legacy, 200)
    }

    fn strict_registry(root: &TempDir) -> AccountRegistry {
        AccountRegistry::new(root.path().to_path_buf(), NamePolicy::Strict, 200)
    }

    /// Names of the entries directly under `dir`
    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn entries_with_prefix(dir: &Path, prefix: &str) -> Vec<String> {
        entries(dir)
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect()
    }

    #[tokio::test]
    async fn create_makes_one_folder_for_the_name() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);

        let id = registry.create("alice").await.unwrap();

        let folders = entries(root.path());
        assert_eq!(folders.len(), 1);
        assert!(folders[0].starts_with("alice-"));

        let account = registry.get(id).await.unwrap();
        assert_eq!(account.display_name(), "alice");
        assert_eq!(account.folder_name(), folders[0]);
        assert!(root.path().join(account.folder_name()).is_dir());
    }

    #[tokio::test]
    async fn create_creates_missing_storage_root() {
        let root = TempDir::new().unwrap();
        let registry = AccountRegistry::new(root.path().join("nested/root"), NamePolicy::Legacy, 200);

        let id = registry.create("alice").await.unwrap();

        let account = registry.get(id).await.unwrap();
        assert!(registry.storage_root().join(account.folder_name()).is_dir());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_live_name() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        registry.create("alice").await.unwrap();

        let err = registry.create("alice").await.unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateName(ref n) if n == "alice"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(entries_with_prefix(root.path(), "alice").len(), 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn create_name_check_is_case_sensitive() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);

        registry.create("alice").await.unwrap();
        registry.create("Alice").await.unwrap();

        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn create_allows_a_name_again_after_delete() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);

        let first = registry.create("alice").await.unwrap();
        registry.delete(first).await.unwrap();
        let second = registry.create("alice").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(entries_with_prefix(root.path(), "alice").len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_names_without_touching_disk() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);

        let err = registry.create("../escape").await.unwrap_err();

        assert!(matches!(
            err,
            RegistryError::InvalidName(NameError::ForbiddenCharacter('/'))
        ));
        assert!(entries(root.path()).is_empty());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn failed_folder_creation_registers_nothing() {
        let root = TempDir::new().unwrap();
        // storage root is a regular file, so no folder can be created under it
        let blocked_root = root.path().join("blocked");
        fs::write(&blocked_root, b"not a directory").unwrap();
        let registry = AccountRegistry::new(blocked_root, NamePolicy::Legacy, 200);

        let err = registry.create("alice").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(registry.is_empty().await);

        // a leftover record would make this a duplicate-name conflict
        assert!(matches!(
            registry.create("alice").await.unwrap_err(),
            RegistryError::Storage(_)
        ));
    }

    #[tokio::test]
    async fn legacy_create_ignores_folder_prefixes_on_disk() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("alice-external")).unwrap();
        let registry = registry(&root);

        registry.create("alice").await.unwrap();

        assert_eq!(entries_with_prefix(root.path(), "alice").len(), 2);
    }

    #[tokio::test]
    async fn strict_create_rejects_folder_prefix_on_disk() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("alice-external")).unwrap();
        let registry = strict_registry(&root);

        let err = registry.create("alice").await.unwrap_err();

        assert!(matches!(err, RegistryError::FolderExists(_)));
        assert_eq!(entries(root.path()), vec!["alice-external".to_string()]);
    }

    #[tokio::test]
    async fn delete_unknown_account_is_not_found() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);

        let err = registry.delete(AccountId::generate()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_removes_folder_and_record() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let id = registry.create("bob").await.unwrap();
        let folder = registry.get(id).await.unwrap().folder_name().to_string();
        fs::write(root.path().join(&folder).join("notes.txt"), b"hello").unwrap();

        registry.delete(id).await.unwrap();

        assert!(!root.path().join(&folder).exists());
        assert!(registry.get(id).await.is_none());
        assert_eq!(registry.delete(id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_succeeds_when_folder_was_removed_externally() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let id = registry.create("bob").await.unwrap();
        let folder = registry.get(id).await.unwrap().folder_name().to_string();
        fs::remove_dir(root.path().join(&folder)).unwrap();

        registry.delete(id).await.unwrap();

        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn delete_failure_keeps_record() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let id = registry.create("carol").await.unwrap();
        let folder = registry.get(id).await.unwrap().folder_name().to_string();
        // a regular file where the folder should be makes removal fail
        fs::remove_dir(root.path().join(&folder)).unwrap();
        fs::write(root.path().join(&folder), b"not a directory").unwrap();

        let err = registry.delete(id).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        let account = registry.get(id).await.unwrap();
        assert_eq!(account.folder_name(), folder);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn rename_unknown_account_is_not_found() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);

        let err = registry
            .rename(AccountId::generate(), "carol")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn rename_moves_folder_and_updates_record() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let id = registry.create("alice").await.unwrap();
        let old_folder = registry.get(id).await.unwrap().folder_name().to_string();
        fs::write(root.path().join(&old_folder).join("keep.txt"), b"data").unwrap();

        let new_folder = registry.rename(id, "alicia").await.unwrap();

        assert!(new_folder.starts_with("alicia-"));
        assert!(!root.path().join(&old_folder).exists());
        assert!(root.path().join(&new_folder).join("keep.txt").is_file());

        let account = registry.get(id).await.unwrap();
        assert_eq!(account.folder_name(), new_folder);
        assert_eq!(account.display_name(), "alice");
    }

    #[tokio::test]
    async fn rename_rejects_existing_folder_prefix() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let alice = registry.create("alice").await.unwrap();
        let bob = registry.create("bob").await.unwrap();
        let bob_folder = registry.get(bob).await.unwrap().folder_name().to_string();

        // "ali" is a literal prefix of alice's folder
        let err = registry.rename(bob, "ali").await.unwrap_err();

        assert!(matches!(err, RegistryError::FolderExists(ref n) if n == "ali"));
        assert!(root.path().join(&bob_folder).is_dir());
        assert_eq!(registry.get(bob).await.unwrap().folder_name(), bob_folder);
        assert!(registry.get(alice).await.is_some());
    }

    #[tokio::test]
    async fn rename_to_own_name_conflicts_with_own_folder() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let id = registry.create("alice").await.unwrap();

        let err = registry.rename(id, "alice").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn legacy_rename_ignores_live_display_names() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let alice = registry.create("alice").await.unwrap();
        let bob = registry.create("bob").await.unwrap();
        registry.rename(alice, "alicia").await.unwrap();

        // no folder starts with "alice" any more, and legacy rename only looks at disk
        registry.rename(bob, "alice").await.unwrap();

        assert_eq!(entries_with_prefix(root.path(), "alice-").len(), 1);
    }

    #[tokio::test]
    async fn strict_rename_rejects_live_display_name() {
        let root = TempDir::new().unwrap();
        let registry = strict_registry(&root);
        let alice = registry.create("alice").await.unwrap();
        let bob = registry.create("bob").await.unwrap();
        registry.rename(alice, "alicia").await.unwrap();

        let err = registry.rename(bob, "alice").await.unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn strict_rename_back_to_own_original_name() {
        let root = TempDir::new().unwrap();
        let registry = strict_registry(&root);
        let id = registry.create("alice").await.unwrap();
        registry.rename(id, "bob").await.unwrap();

        let folder = registry.rename(id, "alice").await.unwrap();

        assert!(folder.starts_with("alice-"));
        assert_eq!(entries(root.path()), vec![folder]);
    }

    #[tokio::test]
    async fn rename_failure_keeps_old_folder_name() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let id = registry.create("dave").await.unwrap();
        let old_folder = registry.get(id).await.unwrap().folder_name().to_string();
        fs::remove_dir(root.path().join(&old_folder)).unwrap();

        let err = registry.rename(id, "david").await.unwrap_err();

        assert!(matches!(err, RegistryError::Storage(_)));
        assert_eq!(registry.get(id).await.unwrap().folder_name(), old_folder);
        assert!(entries_with_prefix(root.path(), "david").is_empty());
    }

    #[tokio::test]
    async fn rename_validates_new_name() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);
        let id = registry.create("erin").await.unwrap();

        let err = registry.rename(id, "").await.unwrap_err();

        assert!(matches!(err, RegistryError::InvalidName(NameError::Empty)));
    }

    #[tokio::test]
    async fn full_account_lifecycle() {
        let root = TempDir::new().unwrap();
        let registry = registry(&root);

        let id = registry.create("alice").await.unwrap();
        assert_eq!(entries_with_prefix(root.path(), "alice-").len(), 1);

        assert_eq!(
            registry.create("alice").await.unwrap_err().kind(),
            ErrorKind::Conflict
        );
        assert_eq!(entries_with_prefix(root.path(), "alice-").len(), 1);

        let folder = registry.rename(id, "alicia").await.unwrap();
        assert!(folder.starts_with("alicia-"));
        assert!(entries_with_prefix(root.path(), "alice-").is_empty());
        assert_eq!(entries(root.path()), vec![folder.clone()]);

        registry.delete(id).await.unwrap();
        assert!(entries(root.path()).is_empty());
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_name_register_once() {
        let root = TempDir::new().unwrap();
        let registry = std::sync::Arc::new(registry(&root));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = std::sync::Arc::clone(&registry);
            handles.push(tokio::spawn(async move { registry.create("frank").await }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(entries_with_prefix(root.path(), "frank-").len(), 1);
    }
}
