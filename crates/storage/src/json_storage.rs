//! JSON file capacity store.
//!
//! Keeps every override in a single pretty-printed JSON document. Each write
//! re-reads the file, applies the change and replaces the file through a
//! temporary sibling, so a crashed write never leaves a truncated document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use workpulse_core::MemberId;
use super::{CapacityStore, Result, StorageError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCapacity {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    members: BTreeMap<MemberId, f64>,
}

/// File-based JSON capacity store.
pub struct JsonCapacityStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCapacityStore {
    /// Open (or lazily create) the store at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredCapacity> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredCapacity::default());
            }
            Err(e) => return Err(e.into()),
        };
        let stored: StoredCapacity = serde_json::from_str(&content)?;
        for (member, hours) in &stored.members {
            if !hours.is_finite() || *hours < 0.0 {
                return Err(StorageError::InvalidValue {
                    key: member.to_string(),
                    value: *hours,
                });
            }
        }
        Ok(stored)
    }

    fn write(&self, stored: &StoredCapacity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(stored)?.as_bytes())?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CapacityStore for JsonCapacityStore {
    fn load(&self, member: &MemberId) -> Result<Option<f64>> {
        Ok(self.read()?.members.get(member).copied())
    }

    fn save(&self, member: &MemberId, hours: f64) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut stored = self.read()?;
        stored.members.insert(member.clone(), hours);
        stored.version += 1;
        self.write(&stored)?;
        debug!("Saved capacity for {} (version {})", member, stored.version);
        Ok(())
    }

    fn list(&self) -> Result<Vec<(MemberId, f64)>> {
        Ok(self.read()?.members.into_iter().collect())
    }
}
