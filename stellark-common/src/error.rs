//! Error types shared by the Stellark crates

use thiserror::Error;

/// Result alias used throughout `stellark-common`
pub type Result<T> = std::result::Result<T, Error>;

/// Failures outside the classification engine
///
/// The engine itself is total and never produces one of these; they come from
/// configuration loading, the SQLite store, and input conversion at the boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite store failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure (root folder creation, config file reads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored JSON column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed or resolved
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied value rejected before reaching the engine
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored row holds a value this version cannot decode
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}
