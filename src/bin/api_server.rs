// src/bin/api_server.rs

use std::sync::Arc;
use storefront_api::infra::logging::init_tracing;
use storefront_api::{transport, Config, MemoryStore, PostgresStore, Services};
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // --- Configuration ---
    let config = Config::from_env()?;
    info!(bind_addr = %config.bind_addr, graphql = ?config.graphql, "configuration loaded");

    // --- Store + Service Initialization ---
    let services = match &config.database {
        Some(db) => {
            info!(max_connections = db.max_connections, "connecting to PostgreSQL");
            let store = PostgresStore::connect(&db.url, db.max_connections).await?;
            store.migrate().await?;
            Services::from_config(Arc::new(store), &config.auth)?
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store (data is lost on exit)");
            Services::from_config(Arc::new(MemoryStore::new()), &config.auth)?
        }
    };
    let app_state = transport::http::AppState::new(Arc::new(services), config.graphql);

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
        )
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("GraphQL endpoint on http://{}/graphql", config.bind_addr);
    info!("Swagger UI on http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
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
}
