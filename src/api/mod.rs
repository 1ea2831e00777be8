//! HTTP interface
//!
//! Routes, JSON bodies and the handlers that forward to the account registry.

pub mod handlers;
pub mod requests;
pub mod responses;
pub mod routes;

pub use routes::router;
