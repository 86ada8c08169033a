// src/bin/api_server.rs

use commerce_services::infra::{logging, Config};
use commerce_services::transport;
use commerce_services::DatabaseService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(config.log_format);

    // --- Service Initialization ---
    tracing::info!("initializing DatabaseService");
    let db_service = Arc::new(
        DatabaseService::connect(config.require_database_url()?, config.max_connections).await?,
    );
    tracing::info!("DatabaseService initialized, tables ensured");

    let app_state = transport::http::AppState {
        db_service: db_service.clone(),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(config.api_bind_addr).await?;
    tracing::info!(addr = %config.api_bind_addr, "store API listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui", config.api_bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_service.close().await;
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
