// src/bin/api_server.rs

use std::sync::Arc;
use storefront_catalog::infra::logging;
use storefront_catalog::storage::postgres;
use storefront_catalog::transport;
use storefront_catalog::{AppState, Config, FsPhotoReader, HeaderAuthenticator, MemoryStore, StoreBackend};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init();

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let reader = Arc::new(FsPhotoReader);
    let authenticator = Arc::new(HeaderAuthenticator);

    // --- Store Initialization ---
    let app_state = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            tracing::info!(max_connections = config.db_max_connections, "connecting to postgres");
            let pool = postgres::connect(url, config.db_max_connections, config.db_acquire_timeout).await?;
            postgres::ensure_schema(&pool).await?;
            tracing::info!("schema ready");
            AppState::with_postgres(pool, reader, authenticator, config.upload_dir.clone())
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on shutdown");
            AppState::with_memory_store(&MemoryStore::new(), reader, authenticator, config.upload_dir.clone())
        }
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "API server listening");
    tracing::info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
            }
        })
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}
