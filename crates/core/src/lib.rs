//! workpulse core data models.
//!
//! This crate defines the records the capacity and risk engine consumes:
//! tasks, their todos, projects, periods and engine configuration.

#![warn(missing_docs)]

// Core identities
mod id;
mod error;

// Work items
mod project;
mod task;
mod snapshot;

// Measurement
mod period;
mod config;

// Re-exports
pub use id::*;
pub use error::ValidationError;
pub use project::Project;
pub use task::{Task, Todo, TaskFilter, validate_tasks};
pub use snapshot::Snapshot;
pub use period::Period;
pub use config::EngineConfig;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
