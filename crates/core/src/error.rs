//! Input validation errors.

/// A caller-contract violation found in the engine's input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// An hours figure is negative or not finite
    #[error("todo {todo_id}: {field} must be a finite number >= 0, got {value}")]
    InvalidHours {
        /// Offending todo
        todo_id: String,
        /// Field name
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// A todo whose foreign key does not name its owning task
    #[error("todo {todo_id} references task {task_id}, which does not own it")]
    OrphanTodo {
        /// Offending todo
        todo_id: String,
        /// Task the todo points at
        task_id: String,
    },

    /// An entity without an id
    #[error("{0} id must not be blank")]
    MissingId(String),

    /// A configuration value out of range
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
