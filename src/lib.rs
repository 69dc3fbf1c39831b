//! Dokerb - Planning Poker Core
//!
//! This library provides the core of the Dokerb estimation sessions service.
//! It handles:
//! - Session token generation
//! - SQLite-backed session document storage
//! - Users, work packages and estimates per session
//! - PERT estimate aggregation and divergent estimator detection
//!
//! The HTTP layer owns a single [`SessionStore`], obtained through
//! [`StoreCell`] or the process-wide [`store::open`], and hands estimate lists
//! it has fetched to the [`metrics`] functions.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod store;
pub mod token;

pub use config::{ConfigError, StoreConfig};
pub use db::{Database, DbError, DocumentDb};
pub use error::ErrorKind;
pub use metrics::{
    calculate_average_estimate, extract_estimates_for_task,
    get_users_with_max_distance_between_effort, ComputeError,
};
pub use models::{EffortSummary, Estimate, SessionDocument, WorkPackage};
pub use store::{SessionStore, StoreCell, StoreError};
pub use token::{generate_token, TokenError, DEFAULT_TOKEN_LENGTH, MIN_TOKEN_LENGTH};
