//! Name validation
//!
//! Display names become the leading part of a directory name, so they must
//! stay a single path component directly under the storage root.

use uuid::Uuid;

use crate::error::NameError;

/// Check that a display name can be used as a folder name prefix
pub fn validate_display_name(name: &str, max_length: usize) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    if name.len() > max_length {
        return Err(NameError::TooLong {
            length: name.len(),
            max: max_length,
        });
    }

    if name == "." || name == ".." {
        return Err(NameError::Reserved);
    }

    if let Some(c) = name
        .chars()
        .find(|c| *c == '/' || *c == '\\' || c.is_control())
    {
        return Err(NameError::ForbiddenCharacter(c));
    }

    Ok(())
}

/// Build a fresh `<name>-<uuid>` folder name
pub fn generate_folder_name(display_name: &str) -> String {
    format!("{}-{}", display_name, Uuid::new_v4())
}
