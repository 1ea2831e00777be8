//! Account registry
//!
//! In-memory account records and the folders they own.

pub mod account;
pub mod store;

pub use account::{Account, AccountId};
pub use store::AccountRegistry;
