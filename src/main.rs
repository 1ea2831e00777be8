//! User Folder Server - Entry Point
//!
//! HTTP service that creates, renames and deletes one folder per account.

use log::{error, info};
use std::process::ExitCode;

use user_folder_server::error::ServerError;
use user_folder_server::utils::logging::setup_logging;
use user_folder_server::{Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    info!("Launching user folder server...");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;
    let server = Server::new(config).await?;
    server.start().await
}
