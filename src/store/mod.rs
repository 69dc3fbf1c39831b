//! Session store
//!
//! Persistence façade over a [`DocumentDb`]. Every session is one document in
//! the `sessions` collection, keyed by its token. The store keeps no copy of
//! session state: each mutation loads the document, applies the change and
//! writes it back while holding the token's lock from [`TokenLocks`], so
//! concurrent mutations of one session never lose updates. Uniqueness of user
//! names, work package ids and (work package, user) estimate pairs is enforced
//! here rather than by the backend.

pub mod instance;
pub mod locks;

pub use instance::{open, open_with_config, StoreCell};
pub use locks::TokenLocks;

use std::sync::Arc;

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::schema::SESSIONS_COLLECTION;
use crate::db::{DbError, DocumentDb};
use crate::error::ErrorKind;
use crate::models::{Estimate, SessionDocument, WorkPackage};
use crate::token::{generate_token, TokenError};

/// Session store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Proper DB must be provided")]
    InvalidHandle,

    #[error("Unable to open database at {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Invalid store configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Unable to create sessions table")]
    SchemaInitFailed {
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{message}")]
    PersistFailed {
        message: &'static str,
        #[source]
        source: DbError,
    },

    #[error("Session document could not be encoded or decoded: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Session token does not match desired length")]
    InvalidToken,

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),

    #[error("Session with token: {0} does not exist")]
    SessionNotFound(String),

    #[error("User with name: {0} already part of session")]
    UserExists(String),

    #[error("User with name: {0} is not part of session")]
    UserNotFound(String),

    #[error("Work package with ID: {0} already part of session")]
    WorkPackageExists(String),

    #[error("Work package with ID: {0} is not part of session")]
    WorkPackageNotFound(String),

    #[error("No estimate from user: {user_name} for work package: {work_package_id}")]
    EstimateNotFound {
        user_name: String,
        work_package_id: String,
    },

    #[error("Lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHandle | Self::Open { .. } | Self::Config(_) => {
                ErrorKind::InitializationFailure
            }
            Self::Token(e) => e.kind(),
            Self::InvalidToken | Self::EmptyValue(_) => ErrorKind::InvalidArgument,
            Self::SessionNotFound(_)
            | Self::UserNotFound(_)
            | Self::WorkPackageNotFound(_)
            | Self::EstimateNotFound { .. } => ErrorKind::NotFound,
            Self::UserExists(_) | Self::WorkPackageExists(_) => ErrorKind::Conflict,
            Self::SchemaInitFailed { .. }
            | Self::PersistFailed { .. }
            | Self::Document(_)
            | Self::LockPoisoned => ErrorKind::PersistenceFailure,
        }
    }
}

/// Shortened token for log lines
fn token_prefix(token: &str) -> &str {
    token.get(..6).unwrap_or(token)
}

/// Token-addressed session storage
pub struct SessionStore {
    db: Arc<dyn DocumentDb>,
    locks: TokenLocks,
    token_length: usize,
}

impl SessionStore {
    /// Create the store and initialise the backing schema.
    ///
    /// Callers normally go through [`StoreCell`] so that initialisation
    /// happens once per cell.
    pub(crate) fn initialize(
        db: Arc<dyn DocumentDb>,
        token_length: usize,
    ) -> Result<Self, StoreError> {
        // Reject unusable token lengths before touching the backend
        generate_token(token_length as i64)?;

        db.create_collection(SESSIONS_COLLECTION).map_err(|source| {
            tracing::error!("Failed to create sessions collection: {}", source);
            StoreError::SchemaInitFailed { source }
        })?;

        Ok(Self {
            db,
            locks: TokenLocks::new(),
            token_length,
        })
    }

    /// Length of every token issued by this store
    pub fn token_length(&self) -> usize {
        self.token_length
    }

    fn validate_token(&self, token: &str) -> Result<(), StoreError> {
        if token.len() != self.token_length {
            return Err(StoreError::InvalidToken);
        }
        Ok(())
    }

    fn load(&self, token: &str) -> Result<SessionDocument, StoreError> {
        let value = self
            .db
            .fetch(SESSIONS_COLLECTION, token)
            .map_err(|source| StoreError::PersistFailed {
                message: "Unable to read session",
                source,
            })?
            .ok_or_else(|| StoreError::SessionNotFound(token.to_string()))?;

        Ok(serde_json::from_value(value)?)
    }

    /// Validate the token and load its document
    fn read(&self, token: &str) -> Result<SessionDocument, StoreError> {
        self.validate_token(token)?;
        self.load(token)
    }

    /// Run a read-modify-write cycle on one session document
    fn mutate<F>(&self, token: &str, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut SessionDocument) -> Result<(), StoreError>,
    {
        self.validate_token(token)?;

        let result = {
            let lock = self.locks.for_token(token);
            let _guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;
            self.apply_and_store(token, apply)
        };

        // Unknown tokens must not leave lock entries behind
        if matches!(result, Err(StoreError::SessionNotFound(_))) {
            self.locks.release_if_unused(token);
        }
        result
    }

    fn apply_and_store<F>(&self, token: &str, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut SessionDocument) -> Result<(), StoreError>,
    {
        let mut doc = self.load(token)?;
        apply(&mut doc)?;
        doc.touch();

        let value = serde_json::to_value(&doc)?;
        self.db
            .replace(SESSIONS_COLLECTION, token, &value)
            .map_err(|source| match source {
                DbError::MissingKey(_) => StoreError::SessionNotFound(token.to_string()),
                source => {
                    tracing::warn!(
                        "Failed to update session {}: {}",
                        token_prefix(token),
                        source
                    );
                    StoreError::PersistFailed {
                        message: "Unable to update session",
                        source,
                    }
                }
            })
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Create an empty session and return its token
    pub fn create_session(&self) -> Result<String, StoreError> {
        let token = generate_token(self.token_length as i64)?;
        let value = serde_json::to_value(SessionDocument::new(token.as_str()))?;

        self.db
            .insert(SESSIONS_COLLECTION, &token, &value)
            .map_err(|source| {
                tracing::warn!("Failed to store new session: {}", source);
                StoreError::PersistFailed {
                    message: "Unable to store session token",
                    source,
                }
            })?;

        tracing::info!("Created session {}", token_prefix(&token));
        Ok(token)
    }

    /// Delete a session document
    pub fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        self.validate_token(token)?;

        {
            let lock = self.locks.for_token(token);
            let guard = lock.lock().map_err(|_| StoreError::LockPoisoned)?;

            let removed = self
                .db
                .remove(SESSIONS_COLLECTION, token)
                .map_err(|source| StoreError::PersistFailed {
                    message: "Unable to delete session",
                    source,
                })?;
            if !removed {
                drop(guard);
                drop(lock);
                self.locks.release_if_unused(token);
                return Err(StoreError::SessionNotFound(token.to_string()));
            }
        }

        self.locks.forget(token);
        tracing::info!("Deleted session {}", token_prefix(token));
        Ok(())
    }

    /// Check whether a session exists
    pub fn session_exists(&self, token: &str) -> Result<bool, StoreError> {
        match self.read(token) {
            Ok(_) => Ok(true),
            Err(StoreError::SessionNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get a snapshot of a whole session
    pub fn get_session(&self, token: &str) -> Result<SessionDocument, StoreError> {
        self.read(token)
    }

    /// Get all session tokens in creation order
    pub fn list_sessions(&self) -> Result<Vec<String>, StoreError> {
        self.db
            .keys(SESSIONS_COLLECTION)
            .map_err(|source| StoreError::PersistFailed {
                message: "Unable to list sessions",
                source,
            })
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Add a user to a session
    pub fn join_session(&self, token: &str, user_name: &str) -> Result<(), StoreError> {
        if user_name.is_empty() {
            return Err(StoreError::EmptyValue("User name"));
        }

        self.mutate(token, |doc| {
            if doc.has_user(user_name) {
                return Err(StoreError::UserExists(user_name.to_string()));
            }
            doc.users.push(user_name.to_string());
            Ok(())
        })?;

        tracing::debug!("User {} joined session {}", user_name, token_prefix(token));
        Ok(())
    }

    /// Remove a user from a session
    pub fn leave_session(&self, token: &str, user_name: &str) -> Result<(), StoreError> {
        self.mutate(token, |doc| {
            let before = doc.users.len();
            doc.users.retain(|u| u != user_name);
            if doc.users.len() == before {
                return Err(StoreError::UserNotFound(user_name.to_string()));
            }
            Ok(())
        })?;

        tracing::debug!("User {} left session {}", user_name, token_prefix(token));
        Ok(())
    }

    /// Get the users of a session in join order
    pub fn list_users(&self, token: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.read(token)?.users)
    }

    // ------------------------------------------------------------------
    // Work packages
    // ------------------------------------------------------------------

    /// Add a work package with zero effort
    pub fn add_work_package(
        &self,
        token: &str,
        id: &str,
        summary: Option<&str>,
    ) -> Result<(), StoreError> {
        if id.is_empty() {
            return Err(StoreError::EmptyValue("Work package ID"));
        }

        self.mutate(token, |doc| {
            if doc.work_package(id).is_some() {
                return Err(StoreError::WorkPackageExists(id.to_string()));
            }
            doc.work_packages
                .push(WorkPackage::new(id, summary.unwrap_or_default()));
            Ok(())
        })
    }

    /// Remove a work package
    pub fn remove_work_package(&self, token: &str, id: &str) -> Result<(), StoreError> {
        self.mutate(token, |doc| {
            let before = doc.work_packages.len();
            doc.work_packages.retain(|wp| wp.id != id);
            if doc.work_packages.len() == before {
                return Err(StoreError::WorkPackageNotFound(id.to_string()));
            }
            Ok(())
        })
    }

    /// Get the work packages of a session in insertion order
    pub fn list_work_packages(&self, token: &str) -> Result<Vec<WorkPackage>, StoreError> {
        Ok(self.read(token)?.work_packages)
    }

    /// Set the confirmed effort of a work package
    pub fn set_work_package_estimate(
        &self,
        token: &str,
        id: &str,
        effort: f64,
        standard_deviation: Option<f64>,
    ) -> Result<(), StoreError> {
        self.mutate(token, |doc| {
            let wp = doc
                .work_package_mut(id)
                .ok_or_else(|| StoreError::WorkPackageNotFound(id.to_string()))?;
            wp.set_estimate(effort, standard_deviation.unwrap_or(0.0));
            Ok(())
        })
    }

    /// Reset the confirmed effort of a work package to zero
    pub fn clear_work_package_estimate(&self, token: &str, id: &str) -> Result<(), StoreError> {
        self.mutate(token, |doc| {
            let wp = doc
                .work_package_mut(id)
                .ok_or_else(|| StoreError::WorkPackageNotFound(id.to_string()))?;
            wp.clear_estimate();
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Estimates
    // ------------------------------------------------------------------

    /// Record a user's estimate, replacing their previous one for the same
    /// work package
    pub fn add_estimate(&self, token: &str, estimate: Estimate) -> Result<(), StoreError> {
        if estimate.work_package_id.is_empty() {
            return Err(StoreError::EmptyValue("Work package ID"));
        }
        if estimate.user_name.is_empty() {
            return Err(StoreError::EmptyValue("User name"));
        }

        self.mutate(token, |doc| {
            doc.upsert_estimate(estimate);
            Ok(())
        })
    }

    /// Remove a user's estimate for a work package
    pub fn remove_estimate(
        &self,
        token: &str,
        user_name: &str,
        work_package_id: &str,
    ) -> Result<(), StoreError> {
        self.mutate(token, |doc| {
            let idx = doc
                .estimate_position(work_package_id, user_name)
                .ok_or_else(|| StoreError::EstimateNotFound {
                    user_name: user_name.to_string(),
                    work_package_id: work_package_id.to_string(),
                })?;
            doc.estimates.remove(idx);
            Ok(())
        })
    }

    /// Get all estimates of a session in submission order
    pub fn list_estimates(&self, token: &str) -> Result<Vec<Estimate>, StoreError> {
        Ok(self.read(token)?.estimates)
    }
}
