use crate::config::Config;
use crate::http::build_client;
use crate::publish::StoragePublisher;
use crate::records::{MediaStorage, RecordStore};
use crate::stylize::build_stylizer;
use crate::workflow::MintWorkflow;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use mintari_common::paths::MEDIA_URL_PREFIX;
use mintari_db::pool::DbPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

pub mod error;
pub mod pages;
pub mod routes_api;
pub mod routes_mint;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub workflow: Arc<MintWorkflow>,
    pub records: RecordStore,
}

impl AppContext {
    /// Wire up storage, stylizer and publisher from configuration.
    ///
    /// Creates the media directory layout if it does not exist yet.
    pub fn from_config(config: Config, pool: DbPool) -> Result<Self> {
        let storage = MediaStorage::new(config.media.root.clone());
        storage
            .ensure_layout()
            .with_context(|| format!("Failed to prepare media root {:?}", storage.root()))?;

        let records = RecordStore::new(storage.clone(), pool);
        let stylizer = build_stylizer(&config.stylize, &config.http, &storage)
            .context("Failed to set up the stylizer")?;

        let publisher = if config.publish.enabled {
            let client = build_client(config.http.request_timeout());
            Some(StoragePublisher::new(client, &config.publish))
        } else {
            None
        };

        tracing::info!(
            stylizer = stylizer.name(),
            publish = config.publish.enabled,
            media_root = %storage.root().display(),
            "Workflow configured"
        );

        let workflow = MintWorkflow::new(records.clone(), stylizer, publisher);

        Ok(Self {
            config: Arc::new(config),
            workflow: Arc::new(workflow),
            records,
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let media_root = ctx.records.storage().root().to_path_buf();
    let body_limit = ctx.config.server.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .merge(routes_mint::mint_routes())
        .nest("/api", routes_api::api_routes())
        .nest_service(MEDIA_URL_PREFIX, ServeDir::new(media_root))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config, pool: DbPool) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::from_config(config, pool)?;
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
