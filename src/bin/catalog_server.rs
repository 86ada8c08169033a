// src/bin/catalog_server.rs

use commerce_services::infra::{logging, CatalogBackend, Config};
use commerce_services::transport::catalog::{self, chat::ChatHub, CatalogState};
use commerce_services::{CatalogService, DocumentStore, MemoryDocumentStore, PostgresDocumentStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(config.log_format);

    // --- Document Store Initialization ---
    let store: Arc<dyn DocumentStore> = match config.catalog_backend {
        CatalogBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(config.require_database_url()?)
                .await?;
            tracing::info!("document store: postgres (documents table)");
            Arc::new(PostgresDocumentStore::new(pool).await?)
        }
        CatalogBackend::Memory => {
            tracing::warn!("document store: in-memory, data is lost on exit");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let state = CatalogState {
        catalog: CatalogService::new(store.clone()),
        chat: ChatHub::default(),
    };

    // --- Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = catalog::create_router(state).layer(cors);
    let listener = tokio::net::TcpListener::bind(config.catalog_bind_addr).await?;
    tracing::info!(addr = %config.catalog_bind_addr, "catalog service listening (chat on /chat)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("shutdown signal received");
}
