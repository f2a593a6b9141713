// src/server/handlers.rs
use crate::domain::repositories::document_repository::DocumentRepository;
use crate::server::error::{ServerError, ServerResult};
use crate::server::AppState;
use axum::{extract::State, Json};
use serde_json::Value;
use tokio::task;
use tracing::{debug, instrument};

/// `GET /api/data`: the stored document, verbatim
#[instrument(skip_all)]
pub async fn get_data(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    let repository = state.repository.clone();
    let value = task::spawn_blocking(move || repository.fetch())
        .await?
        .map_err(ServerError::Read)?;
    debug!("Served document");
    Ok(Json(value))
}

/// `POST /api/data`: replaces the stored document with the request body
#[instrument(skip_all)]
pub async fn post_data(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ServerResult<&'static str> {
    let repository = state.repository.clone();
    task::spawn_blocking(move || repository.store(&body))
        .await?
        .map_err(ServerError::Save)?;
    debug!("Stored document");
    Ok("Data saved successfully")
}

pub async fn health() -> &'static str {
    "OK"
}
