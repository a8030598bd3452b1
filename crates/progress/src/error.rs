//! Engine errors.

use workpulse_core::ValidationError;
use workpulse_storage::StorageError;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the engine.
///
/// Zero denominators are not errors; they map to defined results.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Input snapshot or configuration violates an invariant
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The capacity store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A period could not be resolved
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    /// A capacity override outside the accepted range
    #[error("daily hours for {member} must be a finite number >= 0, got {hours}")]
    InvalidHours {
        /// Member the write was for
        member: String,
        /// Rejected value
        hours: f64,
    },
}
