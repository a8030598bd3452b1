//! Storage abstraction and implementations for workpulse.
//!
//! The engine only persists one thing itself: the per-member daily capacity
//! overrides. This crate provides the `CapacityStore` interface with an
//! in-memory and a JSON-file backend, plus the loader for task snapshots.

#![warn(missing_docs)]

pub mod trait_;
pub mod memory;
pub mod json_storage;
pub mod snapshot;

pub use trait_::{CapacityStore, StorageError, Result};
pub use memory::MemoryCapacityStore;
pub use json_storage::JsonCapacityStore;
pub use snapshot::load_snapshot;
