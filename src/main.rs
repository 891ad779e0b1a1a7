use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info, warn};

use mood_journal_api::{
    config::{Config, StoreBackend},
    create_router,
    middleware::init_tracing,
    Database, JournalStore, MemoryStore, SharedStore,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let store = match init_store(config.store).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize store: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server is running at http://localhost:{}", config.port);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Build the store once. A failed connection attempt is logged and the server
/// keeps going; requests fail with store errors until the database is reachable,
/// and the schema is created on the first connection that succeeds.
async fn init_store(backend: StoreBackend) -> Result<SharedStore, mood_journal_api::StoreError> {
    match backend {
        StoreBackend::Memory => {
            warn!("Using in-memory journal store; entries are lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres(database_config) => {
            let database = Database::new(database_config)?;

            match database.ping().await {
                Ok(()) => info!("Connected to PostgreSQL"),
                Err(e) => error!("PostgreSQL connection error: {}", e),
            }

            Ok(Arc::new(database))
        }
    }
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
