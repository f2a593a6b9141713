// src/domain/error.rs
use crate::domain::bookmark::BookmarkId;
use crate::domain::category::CategoryId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(BookmarkId),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Dangling reference: bookmark {bookmark} points to missing category {category}")]
    DanglingReference {
        bookmark: BookmarkId,
        category: CategoryId,
    },

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl DomainError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::RepositoryError(msg) => {
                DomainError::RepositoryError(format!("{}: {}", context.into(), msg))
            }
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            err => DomainError::Other(format!("{}: {}", context.into(), err)),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
