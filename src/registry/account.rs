//! Account record
//!
//! An account binds an opaque id to the folder that belongs to it.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Opaque account handle handed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// In-memory account record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    display_name: String,
    folder_name: String,
}

impl Account {
    pub fn new(id: AccountId, display_name: String, folder_name: String) -> Self {
        Self {
            id,
            display_name,
            folder_name,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Name given at creation, never changed afterwards
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Current directory name under the storage root
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    pub(crate) fn set_folder_name(&mut self, folder_name: String) {
        self.folder_name = folder_name;
    }
}
