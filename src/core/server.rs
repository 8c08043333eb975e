//! # HTTP Server
//!
//! Wires a configured `BookStore` into the router and serves it until the
//! process is asked to stop.

use crate::adapters::{InMemoryBookStore, MongoBookStore, MongoSettings};
use crate::core::handlers::AppState;
use crate::core::router::build_router;
use crate::core::{BookStore, ConfigProvider, Deadline};
use crate::domain::ports::StoreKind;
use crate::utils::error::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds the store selected by the configuration.
pub async fn connect_store<C: ConfigProvider>(config: &C) -> Result<Arc<dyn BookStore>> {
    match config.store_kind() {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(InMemoryBookStore::new()))
        }
        StoreKind::Mongo => {
            let settings = MongoSettings {
                uri: config.store_uri().to_string(),
                database: config.database_name().to_string(),
                collection: config.collection_name().to_string(),
                connect_timeout: config.connect_timeout(),
            };
            let store = MongoBookStore::connect(&settings).await?;

            // Not fatal: the driver reconnects on its own once the server is up.
            match store.ping(Deadline::after(config.connect_timeout())).await {
                Ok(()) => tracing::info!("Connected to MongoDB at {}", settings.uri),
                Err(e) => tracing::warn!("MongoDB not reachable yet: {}", e),
            }

            Ok(Arc::new(store))
        }
    }
}

pub struct BookServer {
    addr: SocketAddr,
    router: Router,
}

impl BookServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            router: build_router(state),
        }
    }

    pub async fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let addr = config.socket_addr()?;
        let store = connect_store(config).await?;
        let state = AppState::new(store, config.request_timeout());
        Ok(Self::new(addr, state))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
