// src/infrastructure/repositories/client_state_file.rs

use crate::domain::client_state::ClientState;
use crate::domain::error::DomainResult;
use crate::domain::repositories::client_state_repository::ClientStateRepository;
use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Keeps client-local settings in a small JSON file next to the config
#[derive(Debug)]
pub struct FileClientStateRepository {
    path: PathBuf,
}

impl FileClientStateRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ClientStateRepository for FileClientStateRepository {
    /// Missing or unreadable state is not an error: the client starts with defaults
    fn load(&self) -> DomainResult<ClientState> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No client state at {}", self.path.display());
                return Ok(ClientState::default());
            }
            Err(e) => return Err(InfrastructureError::from(e).into()),
        };
        match serde_json::from_str(&text) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!("Ignoring unreadable client state {}: {}", self.path.display(), e);
                Ok(ClientState::default())
            }
        }
    }

    fn save(&self, state: &ClientState) -> DomainResult<()> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }
}

/// Keeps client-local settings in memory only
#[derive(Debug, Default)]
pub struct EphemeralClientStateRepository {
    state: std::sync::Mutex<ClientState>,
}

impl ClientStateRepository for EphemeralClientStateRepository {
    fn load(&self) -> DomainResult<ClientState> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, state: &ClientState) -> DomainResult<()> {
        *self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client_state::ActiveCategory;
    use tempfile::TempDir;

    #[test]
    fn given_no_file_when_load_then_defaults() {
        let dir = TempDir::new().unwrap();
        let repo = FileClientStateRepository::new(dir.path().join("client.json"));
        assert_eq!(repo.load().unwrap(), ClientState::default());
    }

    #[test]
    fn given_saved_state_when_load_then_same_state() {
        let dir = TempDir::new().unwrap();
        let repo = FileClientStateRepository::new(dir.path().join("sub").join("client.json"));
        let state = ClientState {
            active_category: Some(ActiveCategory::Category(1700000000000)),
            allow_drag: true,
            single_category_view: false,
        };

        repo.save(&state).unwrap();

        assert_eq!(repo.load().unwrap(), state);
    }

    #[test]
    fn given_garbage_file_when_load_then_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.json");
        fs::write(&path, "][").unwrap();
        let repo = FileClientStateRepository::new(path);
        assert_eq!(repo.load().unwrap(), ClientState::default());
    }
}
