//! Snapshot file loading.
//!
//! Snapshots are produced by the task-management side; this crate only reads
//! them.

use std::path::Path;
use tokio::fs;
use tracing::debug;
use workpulse_core::Snapshot;
use super::{Result, StorageError};

/// Read a snapshot JSON file.
pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let json = match fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    let snapshot: Snapshot = serde_json::from_str(&json)?;
    debug!(
        "Loaded snapshot for project {} with {} tasks",
        snapshot.project.id,
        snapshot.tasks.len()
    );
    Ok(snapshot)
}
