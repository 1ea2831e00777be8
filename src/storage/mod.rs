//! File system storage management
//!
//! Handles directory lifecycle and folder naming rules.

pub mod filesystem;
pub mod validation;

pub use validation::{generate_folder_name, validate_display_name};
