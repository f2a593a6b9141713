// src/config.rs
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Base URL of the persistence service the client talks to
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Address `navigator serve` listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// File the server keeps the document in
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Client-local settings (active category, view mode, drag toggle)
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Where `export` writes backups
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/navigator")
}

fn default_server_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_data_file() -> String {
    config_dir().join("data.json").to_string_lossy().to_string()
}

fn default_state_file() -> String {
    config_dir().join("state.json").to_string_lossy().to_string()
}

fn default_backup_dir() -> String {
    ".".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            bind_addr: default_bind_addr(),
            data_file: default_data_file(),
            state_file: default_state_file(),
            backup_dir: default_backup_dir(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Settings {
    pub fn data_file_path(&self) -> PathBuf {
        expand_path(&self.data_file)
    }

    pub fn state_file_path(&self) -> PathBuf {
        expand_path(&self.state_file)
    }

    pub fn backup_dir_path(&self) -> PathBuf {
        expand_path(&self.backup_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Expands `~` and `$VAR`; unresolvable variables leave the path as written
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            debug!("Cannot expand {}: {}", path, e);
            PathBuf::from(path)
        }
    }
}

/// Load settings from a config file and environment variables.
///
/// An explicit `config_file` must exist and parse; the default location is
/// optional and ignored when unreadable.
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = config_dir().join("config.toml");
            if default_path.exists() {
                read_config_file(&default_path).unwrap_or_else(|e| {
                    debug!("Ignoring config {:?}: {}", default_path, e);
                    Settings::default()
                })
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings);

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    trace!("Loading config from: {:?}", path);
    let config_text = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Other(format!("Cannot read config {:?}: {}", path, e)))?;
    toml::from_str::<Settings>(&config_text)
        .map_err(|e| DomainError::SerializationError(format!("Invalid config {:?}: {}", path, e)))
}

fn apply_env_overrides(settings: &mut Settings) {
    let overrides: [(&str, &mut String); 5] = [
        ("NAVIGATOR_SERVER_URL", &mut settings.server_url),
        ("NAVIGATOR_BIND_ADDR", &mut settings.bind_addr),
        ("NAVIGATOR_DATA_FILE", &mut settings.data_file),
        ("NAVIGATOR_STATE_FILE", &mut settings.state_file),
        ("NAVIGATOR_BACKUP_DIR", &mut settings.backup_dir),
    ];
    for (name, field) in overrides {
        if let Ok(value) = std::env::var(name) {
            trace!("Using {} from environment: {}", name, value);
            *field = value;
        }
    }
}

pub fn generate_default_config() -> String {
    let default_settings = Settings::default();
    toml::to_string_pretty(&default_settings)
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
