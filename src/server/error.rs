// src/server/error.rs
use crate::domain::error::DomainError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Error reading data: {0}")]
    Read(DomainError),

    #[error("Error saving data: {0}")]
    Save(DomainError),

    #[error("Storage task failed: {0}")]
    Task(String),

    #[error("Invalid bind address '{0}'")]
    Address(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot prepare data file: {0}")]
    Init(DomainError),
}

impl IntoResponse for ServerError {
    /// Clients see a fixed plain-text message; the cause goes to the log
    fn into_response(self) -> Response {
        error!("{}", self);
        let message = match self {
            ServerError::Save(_) => "Error saving data",
            ServerError::Read(_) => "Error reading data",
            _ => "Internal server error",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Task(err.to_string())
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
