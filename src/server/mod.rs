//! Server core functionality
//!
//! Listener bootstrap, storage root preparation and the serve loop.

pub mod core;

pub use self::core::Server;
