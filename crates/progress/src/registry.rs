//! Per-member daily capacity.

use std::sync::Arc;
use tracing::{info, warn};
use workpulse_core::MemberId;
use workpulse_storage::{CapacityStore, MemoryCapacityStore};
use crate::error::{EngineError, Result};

/// Resolves each member's workable hours per day.
///
/// Overrides live in the injected store; members without one get the
/// configured default.
#[derive(Clone)]
pub struct CapacityRegistry {
    store: Arc<dyn CapacityStore>,
    default_daily_hours: f64,
}

impl CapacityRegistry {
    /// Create a registry over a store.
    pub fn new(store: Arc<dyn CapacityStore>, default_daily_hours: f64) -> Self {
        Self {
            store,
            default_daily_hours,
        }
    }

    /// Registry backed by a fresh in-memory store.
    pub fn in_memory(default_daily_hours: f64) -> Self {
        Self::new(Arc::new(MemoryCapacityStore::new()), default_daily_hours)
    }

    /// Fallback for members without an override.
    pub fn default_daily_hours(&self) -> f64 {
        self.default_daily_hours
    }

    /// The member's override, or the default. Never fails: a store error is
    /// logged and answered with the default.
    pub fn get_daily_hours(&self, member: &MemberId) -> f64 {
        match self.store.load(member) {
            Ok(Some(hours)) => hours,
            Ok(None) => self.default_daily_hours,
            Err(e) => {
                warn!("Capacity lookup for {} failed, using default: {}", member, e);
                self.default_daily_hours
            }
        }
    }

    /// Store or overwrite a member's override.
    pub fn set_daily_hours(&self, member: &MemberId, hours: f64) -> Result<()> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(EngineError::InvalidHours {
                member: member.to_string(),
                hours,
            });
        }
        self.store.save(member, hours)?;
        info!("Set daily capacity for {} to {}h", member, hours);
        Ok(())
    }

    /// All stored overrides.
    pub fn overrides(&self) -> Result<Vec<(MemberId, f64)>> {
        Ok(self.store.list()?)
    }
}

impl std::fmt::Debug for CapacityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapacityRegistry")
            .field("default_daily_hours", &self.default_daily_hours)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workpulse_storage::StorageError;

    struct BrokenStore;

    impl CapacityStore for BrokenStore {
        fn load(&self, _member: &MemberId) -> workpulse_storage::Result<Option<f64>> {
            Err(StorageError::NotFound("capacity.json".to_string()))
        }
        fn save(&self, _member: &MemberId, _hours: f64) -> workpulse_storage::Result<()> {
            Err(StorageError::NotFound("capacity.json".to_string()))
        }
        fn list(&self) -> workpulse_storage::Result<Vec<(MemberId, f64)>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_unknown_member_gets_default() {
        let registry = CapacityRegistry::in_memory(8.0);
        assert_eq!(registry.get_daily_hours(&MemberId::new("alice")), 8.0);
    }

    #[test]
    fn test_set_then_get_returns_exact_value() {
        let registry = CapacityRegistry::in_memory(8.0);
        let alice = MemberId::new("alice");
        registry.set_daily_hours(&alice, 6.0).unwrap();
        assert_eq!(registry.get_daily_hours(&alice), 6.0);

        // A second registry over the same store sees the override.
        let shared = registry.clone();
        assert_eq!(shared.get_daily_hours(&alice), 6.0);
    }

    #[test]
    fn test_zero_hours_is_a_valid_override() {
        let registry = CapacityRegistry::in_memory(8.0);
        let bob = MemberId::new("bob");
        registry.set_daily_hours(&bob, 0.0).unwrap();
        assert_eq!(registry.get_daily_hours(&bob), 0.0);
    }

    #[test]
    fn test_rejects_negative_and_non_finite_hours() {
        let registry = CapacityRegistry::in_memory(8.0);
        let alice = MemberId::new("alice");
        assert!(matches!(
            registry.set_daily_hours(&alice, -1.0),
            Err(EngineError::InvalidHours { .. })
        ));
        assert!(registry.set_daily_hours(&alice, f64::INFINITY).is_err());
        assert_eq!(registry.get_daily_hours(&alice), 8.0);
    }

    #[test]
    fn test_store_failure_falls_back_to_default() {
        let registry = CapacityRegistry::new(Arc::new(BrokenStore), 7.5);
        assert_eq!(registry.get_daily_hours(&MemberId::new("alice")), 7.5);
        assert!(matches!(
            registry.set_daily_hours(&MemberId::new("alice"), 4.0),
            Err(EngineError::Storage(_))
        ));
    }
}
