//! The input bundle handed over by the task-management side.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::id::MemberId;
use crate::project::Project;
use crate::task::{validate_tasks, Task, TaskFilter};

/// Tasks, roster and schedule of one project, as of one moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The project under assessment
    pub project: Project,

    /// Project roster
    #[serde(default)]
    pub members: Vec<MemberId>,

    /// Tasks with their todos
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Snapshot {
    /// Tasks that belong to the snapshot's project.
    pub fn project_tasks(&self) -> Vec<Task> {
        let filter = TaskFilter {
            project_id: Some(self.project.id.clone()),
        };
        self.tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
    }

    /// Validate every task.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_tasks(&self.tasks)
    }
}
