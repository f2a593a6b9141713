use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend responded with {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File system error: {0}")]
    FileSystem(String),
}

// Implement conversion from infrastructure errors to domain errors
impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Serialization(msg) => DomainError::SerializationError(msg),
            err => DomainError::RepositoryError(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for InfrastructureError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            InfrastructureError::Serialization(error.to_string())
        } else {
            InfrastructureError::Network(error.to_string())
        }
    }
}

impl From<std::io::Error> for InfrastructureError {
    fn from(error: std::io::Error) -> Self {
        InfrastructureError::FileSystem(error.to_string())
    }
}

impl From<serde_json::Error> for InfrastructureError {
    fn from(error: serde_json::Error) -> Self {
        InfrastructureError::Serialization(error.to_string())
    }
}
