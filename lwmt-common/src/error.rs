//! Common error types for Less Waste, More Taste

use thiserror::Error;

/// Common result type for LWMT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the LWMT crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document or cache (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested document not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input (empty required field, unparsable value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation requires a signed-in user
    #[error("{0}")]
    SessionRequired(String),

    /// Sign-in or sign-up rejected
    #[error("{0}")]
    Auth(String),

    /// External HTTP API failure (network, status, or body)
    #[error("API error: {0}")]
    Api(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
