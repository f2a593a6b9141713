// src/server/mod.rs
//! Persistence service: one JSON document behind `GET`/`POST /api/data`.

use crate::config::Settings;
use crate::infrastructure::repositories::file_repository::FileDocumentRepository;
use axum::{
    http::Method,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

pub mod error;
pub mod handlers;

use error::{ServerError, ServerResult};

#[derive(Debug, Clone)]
pub struct AppState {
    pub repository: Arc<FileDocumentRepository>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/data", get(handlers::get_data).post(handlers::post_data))
        .route("/api/health", get(handlers::health))
        .with_state(state)
        .layer(cors)
}

/// Serves until Ctrl-C. The data file is created first if missing.
#[instrument(skip_all, fields(addr = %settings.bind_addr))]
pub async fn run_server(settings: &Settings) -> ServerResult<()> {
    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .map_err(|_| ServerError::Address(settings.bind_addr.clone()))?;

    let repository = Arc::new(FileDocumentRepository::new(settings.data_file_path()));
    let init_repository = repository.clone();
    tokio::task::spawn_blocking(move || init_repository.initialize())
        .await?
        .map_err(ServerError::Init)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Serving {} on http://{}",
        repository.path().display(),
        listener.local_addr()?
    );

    axum::serve(listener, router(AppState { repository }))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
