pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod registry;
pub mod server;
pub mod storage;
pub mod utils;

pub use crate::config::ServerConfig;
pub use registry::AccountRegistry;
pub use server::Server;
