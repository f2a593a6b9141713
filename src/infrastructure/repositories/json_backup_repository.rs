// src/infrastructure/repositories/json_backup_repository.rs

use crate::domain::document::Document;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::backup_repository::BackupRepository;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct JsonBackupRepository;

impl Default for JsonBackupRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonBackupRepository {
    pub fn new() -> Self {
        Self
    }
}

impl BackupRepository for JsonBackupRepository {
    fn read_backup(&self, path: &Path) -> DomainResult<Value> {
        let file = File::open(path).map_err(|e| {
            DomainError::RepositoryError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let mut reader = BufReader::new(file);
        let mut content = String::new();
        reader.read_to_string(&mut content).map_err(|e| {
            DomainError::RepositoryError(format!("Failed to read file content: {}", e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            DomainError::SerializationError(format!(
                "Failed to parse JSON: {}. Expected a navigator backup file.",
                e
            ))
        })
    }

    fn write_backup(&self, dir: &Path, file_name: &str, doc: &Document) -> DomainResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&path, json)?;
        debug!("Backup written to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn given_backup_file_when_read_then_returns_json() -> DomainResult<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(
            temp_file,
            r#"{{"categories": [{{"id": 1, "name": "A"}}], "bookmarks": [], "allowDraggingCategories": true}}"#
        )?;

        let value = JsonBackupRepository::new().read_backup(temp_file.path())?;

        assert_eq!(value["categories"][0]["name"], "A");
        assert_eq!(value["allowDraggingCategories"], true);
        Ok(())
    }

    #[test]
    fn given_invalid_json_when_read_then_serialization_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"{{"categories": invalid json}}"#).unwrap();

        let result = JsonBackupRepository::new().read_backup(temp_file.path());
        assert!(matches!(result, Err(DomainError::SerializationError(_))));
    }

    #[test]
    fn given_missing_file_when_read_then_repository_error() {
        let result = JsonBackupRepository::new().read_backup(Path::new("/nonexistent/backup.json"));
        assert!(matches!(result, Err(DomainError::RepositoryError(_))));
    }

    #[test]
    fn given_document_when_write_then_file_parses_back() -> DomainResult<()> {
        let dir = TempDir::new()?;
        let doc = Document::fallback();

        let path = JsonBackupRepository::new().write_backup(dir.path(), "b.json", &doc)?;

        assert_eq!(path, dir.path().join("b.json"));
        let back: Document = serde_json::from_str(&fs::read_to_string(path)?)?;
        assert_eq!(back, doc);
        Ok(())
    }
}
