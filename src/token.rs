//! Session token generation
//!
//! Tokens are the only identifier handed out to callers, so they are drawn
//! from the operating system CSPRNG over the 62-character alphanumeric
//! alphabet (~5.95 bits per character, ~190 bits for the default length).

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use thiserror::Error;

use crate::error::ErrorKind;

/// Shortest token length accepted by [`generate_token`]
pub const MIN_TOKEN_LENGTH: usize = 20;

/// Length of tokens issued for new sessions
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Token generation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token length provided: {length}, should be >= {min}")]
    InvalidLength { length: i64, min: usize },
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

/// Generate a random alphanumeric token of exactly `length` characters
pub fn generate_token(length: i64) -> Result<String, TokenError> {
    if length < MIN_TOKEN_LENGTH as i64 {
        return Err(TokenError::InvalidLength {
            length,
            min: MIN_TOKEN_LENGTH,
        });
    }

    let token = OsRng
        .sample_iter(&Alphanumeric)
        .take(length as usize)
        .map(char::from)
        .collect();

    Ok(token)
}
