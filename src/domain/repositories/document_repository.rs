// src/domain/repositories/document_repository.rs
use crate::domain::error::DomainResult;
use serde_json::Value;
use std::fmt::Debug;

/// Whole-document persistence.
///
/// The stored JSON is passed through verbatim: the repository does not check
/// that it is a well-formed document. Interpreting it is the caller's job.
pub trait DocumentRepository: Debug + Send + Sync {
    /// Stored document, or the empty document when nothing has been stored yet
    fn fetch(&self) -> DomainResult<Value>;

    /// Replaces the stored document
    fn store(&self, value: &Value) -> DomainResult<()>;
}
