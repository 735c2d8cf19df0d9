//! Error types for the navigation stack and the session store.

use thiserror::Error;

/// Errors raised by [`crate::navigation::NavigationStack`] operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Invalid characters in navigation stack url: {0}")]
    InvalidUrl(String),

    #[error("No url within the navigation stack")]
    EmptyStack,

    #[error("Navigation stack index {index} out of range (stack has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Persistence errors for stack and session snapshots
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode navigation stack: {0}")]
    Encode(#[from] bincode::Error),

    #[error("Failed to encode session snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
