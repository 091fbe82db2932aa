use anyhow::{Context, Result};
use std::sync::Arc;
use student_registry::{
    api,
    config::{self, StoreBackend},
    logging,
    mongo::MongoStudentStore,
    students::{MemoryStudentStore, StudentService, StudentStore},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::init_config().context("failed to load configuration")?;
    logging::init_tracing();
    tracing::debug!(
        store_backend = ?config.store_backend,
        database = %config.mongodb_database,
        collection = %config.mongodb_collection,
        list_limit = config.list_limit,
        server_port = ?config.server_port,
        "Loaded configuration"
    );

    let store = connect_store(config.store_backend).await?;
    let service = Arc::new(StudentService::new(store, config.list_limit));
    let app = api::create_router(service);

    let (listener, port) = bind_listener().await.context("failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn connect_store(backend: StoreBackend) -> Result<Arc<dyn StudentStore>> {
    match backend {
        StoreBackend::Mongo => {
            let store = MongoStudentStore::new()
                .await
                .context("failed to initialize MongoDB client")?;
            store
                .ping()
                .await
                .context("MongoDB did not answer the startup ping")?;
            tracing::info!("Connected to MongoDB");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStudentStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn bind_listener() -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    let config = config::get_config();
    if let Some(port) = config.server_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 8000..=8099;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 8000-8099",
    ))
}
