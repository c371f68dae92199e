//! Error types for the Eddy solver.
//!
//! All crates return `EddyResult<T>` from fallible operations.
//! Precondition violations inside an operator dispatch (mismatched
//! grids, aliased buffers) are programming errors and panic instead.

use thiserror::Error;

use crate::ids::BufferId;

/// Unified error type for the Eddy solver.
#[derive(Debug, Error)]
pub enum EddyError {
    /// Grid dimensions are unusable.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Data handed to a buffer does not cover the grid exactly.
    #[error("Length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// A buffer handle does not name a live buffer on this backend.
    #[error("Unknown buffer: {0}")]
    UnknownBuffer(BufferId),

    /// Compute device unavailable or failed.
    #[error("Device error: {0}")]
    Device(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, EddyError>`.
pub type EddyResult<T> = Result<T, EddyError>;
