use actix_web::dev::ServerHandle;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Orchestrates graceful shutdown:
/// 1. Listens for SIGTERM or SIGINT/CTRL+C
/// 2. Stops the HTTP server (in-flight requests are drained first)
/// 3. Closes the database connection pool
pub struct ShutdownCoordinator {
    server_handle: ServerHandle,
    server_task: JoinHandle<Result<(), std::io::Error>>,
    pool: PgPool,
}

impl ShutdownCoordinator {
    pub fn new(
        server_handle: ServerHandle,
        server_task: JoinHandle<Result<(), std::io::Error>>,
        pool: PgPool,
    ) -> Self {
        Self {
            server_handle,
            server_task,
            pool,
        }
    }

    /// Block until a shutdown signal arrives, then run the shutdown sequence.
    pub async fn wait_for_shutdown(self) -> Result<(), std::io::Error> {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received CTRL+C signal, initiating graceful shutdown...");
            }
            _ = terminate => {
                info!("Received SIGTERM signal, initiating graceful shutdown...");
            }
        }

        self.shutdown().await
    }

    async fn shutdown(self) -> Result<(), std::io::Error> {
        info!("Stopping HTTP server (no longer accepting new requests)...");
        self.server_handle.stop(true).await;

        match self.server_task.await {
            Ok(Ok(_)) => info!("HTTP server shut down successfully"),
            Ok(Err(e)) => error!("HTTP server encountered error during shutdown: {:?}", e),
            Err(e) => error!("HTTP server task panicked: {:?}", e),
        }

        info!("Closing database connection pool...");
        self.pool.close().await;

        info!("Graceful shutdown completed");
        Ok(())
    }
}
