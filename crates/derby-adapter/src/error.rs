//! Error types for the adapter.

use crate::driver::DriverError;

/// Errors surfaced by the adapter.
///
/// Only connection gating gets its own variant; every other driver failure
/// passes through unmodified, retry and transaction-boundary decisions
/// belong to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The engine version is below the supported minimum. Fatal at
    /// connection setup.
    #[error("connection not established: {0}")]
    ConnectionNotEstablished(String),

    /// A driver error, passed through unchanged.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
