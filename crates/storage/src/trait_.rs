//! Capacity store abstraction.

use workpulse_core::MemberId;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored value the engine cannot use
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Key the value is stored under
        key: String,
        /// The value
        value: f64,
    },

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Key-value store for per-member daily hours.
///
/// Implementations must make `save` atomic per key; concurrent writers to the
/// same key resolve as last-writer-wins.
pub trait CapacityStore: Send + Sync {
    /// Stored override for a member, if any.
    fn load(&self, member: &MemberId) -> Result<Option<f64>>;

    /// Create or overwrite a member's override.
    fn save(&self, member: &MemberId, hours: f64) -> Result<()>;

    /// All overrides, ordered by member id.
    fn list(&self) -> Result<Vec<(MemberId, f64)>>;
}
