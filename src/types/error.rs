//! Error types for upsync

use std::path::PathBuf;
use thiserror::Error;

/// Error types for upsync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local root could not be read at all
    #[error("Scan failed for {path}: {message}")]
    ScanFailed { path: PathBuf, message: String },

    /// Connection or session is broken
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Remote path does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote server refused the operation
    #[error("Permission denied: {0}")]
    Denied(String),

    /// A single file transfer failed
    #[error("Transfer failed for {path}: {message}")]
    TransferFailed { path: String, message: String },
}

impl SyncError {
    /// Fatal errors abort the whole operation; everything else is
    /// handled per item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::ScanFailed { .. } | SyncError::RemoteUnavailable(_) | SyncError::Config(_)
        )
    }

    /// Check if this error is recorded per item rather than propagated
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            SyncError::NotFound(_) | SyncError::Denied(_) | SyncError::TransferFailed { .. }
        )
    }

    /// Check if this error means a remote path does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }
}
