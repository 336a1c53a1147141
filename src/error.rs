//! Error types for EmberKV
//!
//! Provides a unified error type for all operations.
//!
//! "Key not found" and "operation not applicable" are deliberately absent:
//! those are ordinary outcomes, returned as `Option::None` or
//! [`Accumulated`](crate::store::Accumulated) variants.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using EmberError
pub type Result<T> = std::result::Result<T, EmberError>;

/// Unified error type for EmberKV operations
#[derive(Debug, Error)]
pub enum EmberError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key type: {0} (expected integer, float, string, sequence or composite)")]
    InvalidKeyType(String),

    #[error("Reserved key format: {0:?} starts with the reserved numeric prefix")]
    ReservedKeyFormat(String),

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt store file {}: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Save worker failed: {0}")]
    SaveWorker(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EmberError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
