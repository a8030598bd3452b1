//! Project model - the date range progress is measured against.

use serde::{Deserialize, Serialize};
use crate::id::ProjectId;
use crate::Time;

/// A project owns tasks and defines the schedule window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Project name
    #[serde(default)]
    pub name: String,

    /// Planned start
    #[serde(default)]
    pub start_date: Option<Time>,

    /// Planned end
    #[serde(default)]
    pub end_date: Option<Time>,
}

impl Project {
    /// Create a project with a known schedule.
    pub fn new(name: impl Into<String>, start_date: Time, end_date: Time) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    /// Both schedule bounds, when set.
    pub fn schedule(&self) -> Option<(Time, Time)> {
        self.start_date.zip(self.end_date)
    }
}
