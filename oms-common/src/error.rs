//! Common error types for the movie store

use thiserror::Error;

/// Common result type for movie store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the movie store crates
///
/// The message carried by the caller-facing variants (`InvalidInput`,
/// `TypeMismatch`, `Auth`, `Duplicate`, `NotFound`) is safe to show to a
/// client. The remaining variants may contain driver or filesystem detail and
/// must only be logged.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or empty required field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A text field held a value that is neither a string nor null
    #[error("Invalid input. Expected '{field}' to be a string, found {found}")]
    TypeMismatch { field: String, found: &'static str },

    /// Credentials did not match any account
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Row with the same natural key already exists
    #[error("Already exists: {0}")]
    Duplicate(String),

    /// Requested resource not found (or the collection is empty)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Message suitable for returning to a client
    ///
    /// Infrastructure failures collapse into a generic message so that schema
    /// or driver detail never leaves the process.
    pub fn public_message(&self) -> String {
        match self {
            Error::InvalidInput(msg)
            | Error::Auth(msg)
            | Error::Duplicate(msg)
            | Error::NotFound(msg) => msg.clone(),
            Error::TypeMismatch { .. } => self.to_string(),
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                "Internal server error.".to_string()
            }
        }
    }
}
