// src/util/testing.rs

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::document_repository::DocumentRepository;
use serde_json::{json, Value};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// Environment variables the settings loader reads
pub const NAVIGATOR_ENV_VARS: [&str; 5] = [
    "NAVIGATOR_SERVER_URL",
    "NAVIGATOR_BIND_ADDR",
    "NAVIGATOR_DATA_FILE",
    "NAVIGATOR_STATE_FILE",
    "NAVIGATOR_BACKUP_DIR",
];

static TEST_ENV: OnceLock<()> = OnceLock::new();

/// Initializes test logging exactly once
pub fn init_test_env() -> &'static () {
    TEST_ENV.get_or_init(|| {
        setup_test_logging();
        info!("Test environment initialized");
    })
}

fn setup_test_logging() {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["reqwest", "mio", "want", "hyper", "hyper_util", "tower_http"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Restores the NAVIGATOR_* environment on drop
#[derive(Debug, Clone)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            saved: NAVIGATOR_ENV_VARS
                .iter()
                .map(|name| (*name, env::var(name).ok()))
                .collect(),
        }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(val) => env::set_var(name, val),
                None => env::remove_var(name),
            }
        }
    }
}

/// Document repository keeping every stored value in memory
#[derive(Debug)]
pub struct InMemoryDocumentRepository {
    history: Mutex<Vec<Value>>,
    initial: Value,
    failing: AtomicBool,
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentRepository {
    /// Starts out holding the empty document
    pub fn new() -> Self {
        Self::with_value(json!({"categories": [], "bookmarks": [], "collapsedCategories": {}}))
    }

    pub fn with_value(initial: Value) -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            initial,
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every fetch and store fail, as an unreachable backend would
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every successfully stored value, oldest first
    pub fn history(&self) -> Vec<Value> {
        self.lock().clone()
    }

    /// Last stored value
    pub fn stored(&self) -> Option<Value> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Value>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_reachable(&self) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::RepositoryError(
                "backend unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn fetch(&self) -> DomainResult<Value> {
        self.check_reachable()?;
        Ok(self.stored().unwrap_or_else(|| self.initial.clone()))
    }

    fn store(&self, value: &Value) -> DomainResult<()> {
        self.check_reachable()?;
        self.lock().push(value.clone());
        Ok(())
    }
}
