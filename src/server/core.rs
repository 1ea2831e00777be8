use log::{error, info};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::api::router;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::registry::AccountRegistry;

pub struct Server {
    listener: TcpListener,
    registry: Arc<AccountRegistry>,
    config: ServerConfig,
}

impl Server {
    /// Prepare the storage root and bind the listener
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let storage_root = config.storage_root_path();
        tokio::fs::create_dir_all(&storage_root)
            .await
            .map_err(|source| ServerError::StorageRoot {
                path: storage_root.clone(),
                source,
            })?;
        info!("Storage root directory: {}", storage_root.display());

        let addr = config.listen_socket();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Server bound to {}", addr);

        let registry = Arc::new(AccountRegistry::from_config(&config));

        Ok(Self {
            listener,
            registry,
            config,
        })
    }

    /// Address actually bound, useful when the configured port is 0
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn registry(&self) -> Arc<AccountRegistry> {
        Arc::clone(&self.registry)
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), ServerError> {
        self.serve(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then let in-flight requests finish
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(
            "Starting user folder server on {} (storage root {}, {:?} name policy)",
            self.config.listen_socket(),
            self.config.storage_root,
            self.config.name_policy
        );

        let app = router(self.registry);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
