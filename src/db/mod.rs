//! Database module for document storage
//!
//! This module handles all backend interactions:
//! - The `DocumentDb` capability the session store is written against
//! - Collection (table) creation
//! - Document insert, fetch, replace and removal on SQLite

pub mod queries;
pub mod schema;

#[cfg(test)]
pub(crate) mod mock;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;
use serde_json::Value;
use thiserror::Error;

/// Path value that selects an in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("Document with key {0} already exists")]
    DuplicateKey(String),

    #[error("Document with key {0} does not exist")]
    MissingKey(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Narrow storage capability used by the session store.
///
/// Documents are JSON values addressed by a string primary key inside a named
/// collection. Implementations must be usable from many threads at once.
pub trait DocumentDb: Send + Sync {
    /// Create the collection if it does not exist yet
    fn create_collection(&self, collection: &str) -> Result<(), DbError>;

    /// Insert a new document; fails with `DuplicateKey` if the key is taken
    fn insert(&self, collection: &str, key: &str, document: &Value) -> Result<(), DbError>;

    /// Fetch a document by key
    fn fetch(&self, collection: &str, key: &str) -> Result<Option<Value>, DbError>;

    /// Overwrite an existing document; fails with `MissingKey` if absent
    fn replace(&self, collection: &str, key: &str, document: &Value) -> Result<(), DbError>;

    /// Remove a document, returning whether it existed
    fn remove(&self, collection: &str, key: &str) -> Result<bool, DbError>;

    /// All keys in insertion order
    fn keys(&self, collection: &str) -> Result<Vec<String>, DbError>;
}

/// Database connection wrapper
pub struct Database {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl Database {
    /// Open (or create) a database file
    pub fn new(path: PathBuf) -> Result<Self, DbError> {
        let conn = Connection::open(&path)?;
        Self::configure(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: PathBuf::from(IN_MEMORY_PATH),
        })
    }

    /// Open the database named by `path`, honouring `:memory:`
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if path == Path::new(IN_MEMORY_PATH) {
            Self::open_in_memory()
        } else {
            Self::new(path.to_path_buf())
        }
    }

    fn configure(conn: &Connection) -> Result<(), DbError> {
        // Wait on a locked file instead of failing immediately
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(())
    }

    /// Get the database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Execute a query with the database connection
    pub fn with_connection<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&conn)
    }
}

impl DocumentDb for Database {
    fn create_collection(&self, collection: &str) -> Result<(), DbError> {
        self.with_connection(|conn| schema::create_collection(conn, collection))
    }

    fn insert(&self, collection: &str, key: &str, document: &Value) -> Result<(), DbError> {
        self.with_connection(|conn| queries::insert_document(conn, collection, key, document))
    }

    fn fetch(&self, collection: &str, key: &str) -> Result<Option<Value>, DbError> {
        self.with_connection(|conn| queries::get_document(conn, collection, key))
    }

    fn replace(&self, collection: &str, key: &str, document: &Value) -> Result<(), DbError> {
        self.with_connection(|conn| queries::replace_document(conn, collection, key, document))
    }

    fn remove(&self, collection: &str, key: &str) -> Result<bool, DbError> {
        self.with_connection(|conn| queries::delete_document(conn, collection, key))
    }

    fn keys(&self, collection: &str) -> Result<Vec<String>, DbError> {
        self.with_connection(|conn| queries::get_document_keys(conn, collection))
    }
}

/// Get the default database path
pub fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("dokerb").join("sessions.db")
}
