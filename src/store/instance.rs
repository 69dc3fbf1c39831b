//! One-shot store construction
//!
//! A [`StoreCell`] hands out a single shared [`SessionStore`]. The first
//! successful open runs schema initialisation; every later open, from any
//! thread and with any handle, returns the same instance. The check and the
//! initialisation happen under one mutex, so racing callers wait for the
//! winner instead of initialising twice. A failed initialisation leaves the
//! cell empty.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::StoreConfig;
use crate::db::{Database, DocumentDb, IN_MEMORY_PATH};

use super::{SessionStore, StoreError};

/// Guarded slot holding the shared store
pub struct StoreCell {
    slot: Mutex<Option<Arc<SessionStore>>>,
}

impl StoreCell {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// The store, if one has been opened
    pub fn get(&self) -> Option<Arc<SessionStore>> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Open the store over an existing backend, or return the open one
    pub fn get_or_open(
        &self,
        db: Arc<dyn DocumentDb>,
        token_length: usize,
    ) -> Result<Arc<SessionStore>, StoreError> {
        self.get_or_init(|| SessionStore::initialize(db, token_length))
    }

    /// Open the SQLite database named by `config`, or return the open store
    pub fn get_or_open_with_config(
        &self,
        config: &StoreConfig,
    ) -> Result<Arc<SessionStore>, StoreError> {
        if config.db_path.as_os_str().is_empty() {
            return Err(StoreError::InvalidHandle);
        }

        self.get_or_init(|| {
            config.validate()?;
            let db = open_database(&config.db_path)?;
            SessionStore::initialize(Arc::new(db), config.token_length)
        })
    }

    fn get_or_init<F>(&self, init: F) -> Result<Arc<SessionStore>, StoreError>
    where
        F: FnOnce() -> Result<SessionStore, StoreError>,
    {
        let mut slot = self.slot.lock().map_err(|_| StoreError::LockPoisoned)?;

        if let Some(store) = slot.as_ref() {
            tracing::debug!("Reusing initialized session store");
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(init()?);
        *slot = Some(Arc::clone(&store));
        tracing::info!("Session store initialized");
        Ok(store)
    }
}

impl Default for StoreCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a SQLite database, creating its directory if needed
fn open_database(path: &Path) -> Result<Database, StoreError> {
    let open_error = |reason: String| StoreError::Open {
        path: path.display().to_string(),
        reason,
    };

    if path != Path::new(IN_MEMORY_PATH) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| open_error(e.to_string()))?;
        }
    }

    tracing::info!("Database path: {:?}", path);
    Database::open(path).map_err(|e| open_error(e.to_string()))
}

// Process-wide store shared by every caller of `open`/`open_with_config`
lazy_static::lazy_static! {
    static ref PROCESS_STORE: StoreCell = StoreCell::new();
}

/// Open the process-wide store over `db`
pub fn open(db: Arc<dyn DocumentDb>, token_length: usize) -> Result<Arc<SessionStore>, StoreError> {
    PROCESS_STORE.get_or_open(db, token_length)
}

/// Open the process-wide store from configuration
pub fn open_with_config(config: &StoreConfig) -> Result<Arc<SessionStore>, StoreError> {
    PROCESS_STORE.get_or_open_with_config(config)
}
