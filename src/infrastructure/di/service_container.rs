// src/infrastructure/di/service_container.rs
use crate::application::error::ApplicationResult;
use crate::application::Session;
use crate::config::Settings;
use crate::domain::repositories::backup_repository::BackupRepository;
use crate::domain::repositories::client_state_repository::ClientStateRepository;
use crate::domain::repositories::document_repository::DocumentRepository;
use crate::infrastructure::repositories::client_state_file::FileClientStateRepository;
use crate::infrastructure::repositories::file_repository::FileDocumentRepository;
use crate::infrastructure::repositories::http_repository::HttpDocumentRepository;
use crate::infrastructure::repositories::json_backup_repository::JsonBackupRepository;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Where the client reads and saves the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// The persistence service at `server_url`
    Server(String),
    /// A data file used directly, without a server
    Local(PathBuf),
}

/// Production service container - single source of truth for repository creation
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    pub source: DocumentSource,
    pub document_repository: Arc<dyn DocumentRepository>,
    pub client_state_repository: Arc<dyn ClientStateRepository>,
    pub backup_repository: Arc<dyn BackupRepository>,
}

impl ServiceContainer {
    /// `local` bypasses the server and operates on that data file
    pub fn new(config: &Settings, local: Option<&Path>) -> ApplicationResult<Self> {
        let (source, document_repository) = Self::create_document_repository(config, local);
        debug!("Document source: {:?}", source);

        Ok(Self {
            source,
            document_repository,
            client_state_repository: Arc::new(FileClientStateRepository::new(
                config.state_file_path(),
            )),
            backup_repository: Arc::new(JsonBackupRepository::new()),
        })
    }

    fn create_document_repository(
        config: &Settings,
        local: Option<&Path>,
    ) -> (DocumentSource, Arc<dyn DocumentRepository>) {
        match local {
            Some(path) => (
                DocumentSource::Local(path.to_path_buf()),
                Arc::new(FileDocumentRepository::new(path)),
            ),
            None => (
                DocumentSource::Server(config.server_url.clone()),
                Arc::new(HttpDocumentRepository::new(
                    &config.server_url,
                    config.request_timeout(),
                )),
            ),
        }
    }

    /// Loads a client session over the configured repositories
    pub fn session(&self) -> ApplicationResult<Session> {
        Session::load(
            self.document_repository.clone(),
            self.client_state_repository.clone(),
            self.backup_repository.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Document;
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir) -> Settings {
        Settings {
            state_file: dir.path().join("state.json").to_string_lossy().to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn given_no_local_file_when_new_then_server_source() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);

        let container = ServiceContainer::new(&settings, None).unwrap();

        assert_eq!(
            container.source,
            DocumentSource::Server("http://localhost:3000".to_string())
        );
    }

    #[test]
    fn given_local_file_when_session_then_document_loaded_from_file() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.json");
        std::fs::write(
            &data,
            serde_json::to_string(&Document::fallback()).unwrap(),
        )
        .unwrap();

        let container = ServiceContainer::new(&settings_in(&dir), Some(&data)).unwrap();
        let session = container.session().unwrap();

        assert_eq!(container.source, DocumentSource::Local(data));
        assert_eq!(session.document(), &Document::fallback());
    }
}
