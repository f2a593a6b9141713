// src/infrastructure/repositories/file_repository.rs

use crate::domain::document::Document;
use crate::domain::error::DomainResult;
use crate::domain::repositories::document_repository::DocumentRepository;
use crate::infrastructure::error::InfrastructureError;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// Stores the document as pretty-printed JSON in a single file.
///
/// Writes go to a temporary file in the target directory which is then renamed
/// over the target, one writer at a time.
#[derive(Debug)]
pub struct FileDocumentRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDocumentRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the data file with the empty document if it does not exist yet.
    /// Returns whether the file was created.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn initialize(&self) -> DomainResult<bool> {
        if self.path.exists() {
            info!("Data file already exists");
            return Ok(false);
        }
        self.store(&Document::empty().to_value()?)?;
        info!("Data file created with empty document");
        Ok(true)
    }

    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn read(&self) -> Result<Value, InfrastructureError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No data file at {}, using empty document", self.path.display());
                Ok(serde_json::to_value(Document::empty())?)
            }
            Err(e) => Err(InfrastructureError::FileSystem(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write(&self, value: &Value) -> Result<(), InfrastructureError> {
        let text = serde_json::to_string_pretty(value)?;
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| {
            InfrastructureError::FileSystem(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;
        Ok(())
    }
}

impl DocumentRepository for FileDocumentRepository {
    #[instrument(skip(self), level = "debug")]
    fn fetch(&self) -> DomainResult<Value> {
        Ok(self.read()?)
    }

    #[instrument(skip(self, value), level = "debug")]
    fn store(&self, value: &Value) -> DomainResult<()> {
        Ok(self.write(value)?)
    }
}
