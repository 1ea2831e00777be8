//! Route table

use axum::Router;
use axum::middleware;
use axum::routing::{delete, patch, post};
use std::sync::Arc;

use crate::api::handlers;
use crate::middleware::logging::log_request;
use crate::registry::AccountRegistry;

/// Build the application router around a shared registry
pub fn router(registry: Arc<AccountRegistry>) -> Router {
    Router::new()
        .route("/create-account", post(handlers::create_account))
        .route("/delete-account/{user_id}", delete(handlers::delete_account))
        .route("/update-folder/{user_id}", patch(handlers::update_folder))
        .layer(middleware::from_fn(log_request))
        .with_state(registry)
}
