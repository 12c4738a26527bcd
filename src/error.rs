//! Error types for the grocery store
//!
//! Provides a unified error type for all fallible operations.
//! Store mutations themselves never fail: unknown ids are reported
//! as `None` / `false`, not as errors.

use thiserror::Error;

/// Result type alias using GroceryError
pub type Result<T> = std::result::Result<T, GroceryError>;

/// Unified error type for grocery store operations
#[derive(Debug, Error)]
pub enum GroceryError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Snapshot corrupted: {0}")]
    SnapshotCorrupt(String),

    #[error("Snapshot persist failed: {0}")]
    Persistence(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for GroceryError {
    fn from(err: serde_json::Error) -> Self {
        GroceryError::Serialization(err.to_string())
    }
}
