//! Error taxonomy shared by every module
//!
//! Each module owns a `thiserror` enum with its literal messages; callers that
//! need to branch on the category (e.g. to pick a response status) use
//! [`ErrorKind`] via the `kind()` method on those enums.

use serde::{Deserialize, Serialize};

/// Stable category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed token, empty id, token length below the minimum
    InvalidArgument,
    /// Unknown session, user, work package, estimate or task
    NotFound,
    /// Duplicate user or work package
    Conflict,
    /// Empty input collection
    InsufficientData,
    /// Most likely case below best case
    InvalidRange,
    /// Backend read/write failure, including schema creation
    PersistenceFailure,
    /// The store could not be constructed from the given handle
    InitializationFailure,
}

impl ErrorKind {
    /// Get display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "Invalid Argument",
            Self::NotFound => "Not Found",
            Self::Conflict => "Conflict",
            Self::InsufficientData => "Insufficient Data",
            Self::InvalidRange => "Invalid Range",
            Self::PersistenceFailure => "Persistence Failure",
            Self::InitializationFailure => "Initialization Failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
