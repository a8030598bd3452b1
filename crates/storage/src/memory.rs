//! In-process capacity store.

use std::collections::HashMap;
use std::sync::RwLock;
use workpulse_core::MemberId;
use super::{CapacityStore, Result};

/// Capacity overrides held in memory only.
#[derive(Debug, Default)]
pub struct MemoryCapacityStore {
    entries: RwLock<HashMap<MemberId, f64>>,
}

impl MemoryCapacityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CapacityStore for MemoryCapacityStore {
    fn load(&self, member: &MemberId) -> Result<Option<f64>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(member).copied())
    }

    fn save(&self, member: &MemberId, hours: f64) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(member.clone(), hours);
        Ok(())
    }

    fn list(&self) -> Result<Vec<(MemberId, f64)>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<_> = entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(all)
    }
}
