//! Task model - containers of schedulable todos.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::id::{MemberId, ProjectId, TaskId, TodoId};
use crate::Time;

/// A task groups the todos of one piece of project work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Owning project
    pub project_id: ProjectId,

    /// Task title
    #[serde(default)]
    pub title: String,

    /// Due date, if any
    #[serde(default)]
    pub due_date: Option<Time>,

    /// Owned todos
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl Task {
    /// Create an empty task in a project.
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            project_id,
            title: title.into(),
            due_date: None,
            todos: Vec::new(),
        }
    }

    /// Append a todo, re-pointing its foreign key at this task.
    pub fn with_todo(mut self, mut todo: Todo) -> Self {
        todo.task_id = self.id.clone();
        self.todos.push(todo);
        self
    }

    /// Check the invariants the engine relies on.
    ///
    /// Completion bookkeeping (`completed_at` vs `completed`) is deliberately
    /// not checked; callers own that consistency.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingId("task".to_string()));
        }
        for todo in &self.todos {
            if todo.task_id != self.id {
                return Err(ValidationError::OrphanTodo {
                    todo_id: todo.id.to_string(),
                    task_id: todo.task_id.to_string(),
                });
            }
            todo.validate()?;
        }
        Ok(())
    }
}

/// The smallest schedulable, assignable unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,

    /// Owning task (foreign key)
    pub task_id: TaskId,

    /// Short description
    #[serde(default)]
    pub title: String,

    /// Whether the todo is done
    #[serde(default)]
    pub completed: bool,

    /// Estimated effort in hours
    pub estimated_hours: f64,

    /// Effort actually spent in hours
    #[serde(default)]
    pub actual_hours: f64,

    /// Assignee, `None` or blank when unassigned
    #[serde(default)]
    pub assignee_id: Option<MemberId>,

    /// Scheduled start (the todo's calendar anchor)
    pub scheduled_start: Time,

    /// Scheduled end
    pub scheduled_end: Time,

    /// Completion timestamp
    #[serde(default)]
    pub completed_at: Option<Time>,
}

impl Todo {
    /// Create an open, unassigned todo.
    pub fn new(
        task_id: TaskId,
        estimated_hours: f64,
        scheduled_start: Time,
        scheduled_end: Time,
    ) -> Self {
        Self {
            id: TodoId::new(),
            task_id,
            title: String::new(),
            completed: false,
            estimated_hours,
            actual_hours: 0.0,
            assignee_id: None,
            scheduled_start,
            scheduled_end,
            completed_at: None,
        }
    }

    /// Set the assignee.
    pub fn assigned_to(mut self, member: impl Into<MemberId>) -> Self {
        self.assignee_id = Some(member.into());
        self
    }

    /// Mark as completed at the given instant.
    pub fn completed_on(mut self, at: Time) -> Self {
        self.completed = true;
        self.completed_at = Some(at);
        self
    }

    /// The effective assignee; blank ids count as unassigned.
    pub fn assignee(&self) -> Option<&MemberId> {
        self.assignee_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Incomplete and scheduled to end strictly before `now`.
    pub fn is_overdue(&self, now: Time) -> bool {
        !self.completed && self.scheduled_end < now
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingId("todo".to_string()));
        }
        check_hours(&self.id, "estimated_hours", self.estimated_hours)?;
        check_hours(&self.id, "actual_hours", self.actual_hours)
    }
}

fn check_hours(id: &TodoId, field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidHours {
            todo_id: id.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

/// Validate every task of a snapshot, failing on the first violation.
pub fn validate_tasks(tasks: &[Task]) -> Result<(), ValidationError> {
    tasks.iter().try_for_each(Task::validate)
}

/// Filter for selecting tasks out of a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Restrict to one project
    pub project_id: Option<ProjectId>,
}

impl TaskFilter {
    /// Whether a task passes the filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.project_id
            .as_ref()
            .map_or(true, |project| &task.project_id == project)
    }
}
