// src/domain/repositories/backup_repository.rs
use crate::domain::document::Document;
use crate::domain::error::DomainResult;
use serde_json::Value;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// User-facing backup files (export/import)
pub trait BackupRepository: Send + Sync + Debug {
    /// Raw JSON content of a backup file; shape is checked by the caller
    fn read_backup(&self, path: &Path) -> DomainResult<Value>;

    /// Writes `doc` as `dir/file_name` and returns the full path
    fn write_backup(&self, dir: &Path, file_name: &str, doc: &Document) -> DomainResult<PathBuf>;
}
