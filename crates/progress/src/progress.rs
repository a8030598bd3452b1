//! Project progress, delay and buffer.

use serde::Serialize;
use tracing::debug;
use workpulse_core::{validate_tasks, EngineConfig, Task, Time, TodoId};
use crate::error::Result;
use crate::percent;

/// Project-wide progress against the schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    /// Estimated hours over every todo
    pub total_estimated_hours: f64,
    /// Estimated hours of completed todos
    pub completed_hours: f64,
    /// Completed over total, 0..=100
    pub progress_rate: i64,
    /// Share of the schedule already elapsed, 0..=100
    pub time_elapsed_rate: i64,
    /// Progress minus elapsed; negative means behind
    pub delay_rate: i64,
    /// Contingency held back from the total estimate
    pub buffer_hours: f64,
    /// Buffer left after overdue todos are charged
    pub remaining_buffer_hours: f64,
    /// Hours charged against the buffer
    pub delayed_hours: f64,
    /// Open todos whose scheduled end has passed, in input order
    pub delayed_todo_ids: Vec<TodoId>,
}

/// Computes progress, elapsed time and buffer consumption.
#[derive(Debug, Clone)]
pub struct ProgressAnalyzer {
    buffer_ratio: f64,
    overdue_hours_per_day: f64,
}

impl ProgressAnalyzer {
    /// Create an analyzer with explicit constants.
    pub fn new(buffer_ratio: f64, overdue_hours_per_day: f64) -> Self {
        Self {
            buffer_ratio,
            overdue_hours_per_day,
        }
    }

    /// Create an analyzer from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.buffer_ratio, config.overdue_hours_per_day)
    }

    /// Analyze `tasks` against the project schedule as of `now`.
    ///
    /// A missing bound or a schedule shorter than one day yields an elapsed
    /// rate of 0.
    pub fn analyze(
        &self,
        tasks: &[Task],
        project_start: Option<Time>,
        project_end: Option<Time>,
        now: Time,
    ) -> Result<ProgressReport> {
        validate_tasks(tasks)?;

        let todos = || tasks.iter().flat_map(|task| task.todos.iter());

        let total_estimated_hours: f64 = todos().map(|t| t.estimated_hours).sum();
        let completed_hours: f64 = todos()
            .filter(|t| t.completed)
            .map(|t| t.estimated_hours)
            .sum();

        let progress_rate = percent(completed_hours, total_estimated_hours, 0);
        let time_elapsed_rate = time_elapsed_rate(project_start, project_end, now);
        let delay_rate = progress_rate - time_elapsed_rate;

        let mut delayed_hours = 0.0;
        let mut delayed_todo_ids = Vec::new();
        for todo in todos().filter(|t| t.is_overdue(now)) {
            // Whole days only; less than a day late charges nothing.
            let days_late = (now - todo.scheduled_end).num_days();
            delayed_hours += days_late as f64 * self.overdue_hours_per_day;
            delayed_todo_ids.push(todo.id.clone());
        }

        let buffer_hours = total_estimated_hours * self.buffer_ratio;
        let remaining_buffer_hours = (buffer_hours - delayed_hours).max(0.0);

        debug!(
            "Progress {}% vs elapsed {}% ({} delayed todos, {:.1}h of {:.1}h buffer left)",
            progress_rate,
            time_elapsed_rate,
            delayed_todo_ids.len(),
            remaining_buffer_hours,
            buffer_hours
        );

        Ok(ProgressReport {
            total_estimated_hours,
            completed_hours,
            progress_rate,
            time_elapsed_rate,
            delay_rate,
            buffer_hours,
            remaining_buffer_hours,
            delayed_hours,
            delayed_todo_ids,
        })
    }
}

impl Default for ProgressAnalyzer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

fn time_elapsed_rate(start: Option<Time>, end: Option<Time>, now: Time) -> i64 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };
    let total_days = (end.date_naive() - start.date_naive()).num_days();
    if total_days <= 0 {
        return 0;
    }
    let elapsed_days = (now.date_naive() - start.date_naive()).num_days();
    percent(elapsed_days as f64, total_days as f64, 0).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use workpulse_core::{ProjectId, TaskId, Todo};

    fn day(d: u32) -> Time {
        Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap()
    }

    fn todo(hours: f64, end: Time) -> Todo {
        Todo::new(TaskId::new(), hours, end - Duration::days(1), end)
    }

    fn task(todos: Vec<Todo>) -> Task {
        todos
            .into_iter()
            .fold(Task::new(ProjectId::from("p"), "Work"), Task::with_todo)
    }

    #[test]
    fn test_empty_input_yields_zeroes() {
        let report = ProgressAnalyzer::default()
            .analyze(&[], Some(day(1)), Some(day(31)), day(16))
            .unwrap();
        assert_eq!(report.progress_rate, 0);
        assert_eq!(report.total_estimated_hours, 0.0);
        assert_eq!(report.buffer_hours, 0.0);
        assert_eq!(report.remaining_buffer_hours, 0.0);
        assert!(report.delayed_todo_ids.is_empty());
    }

    #[test]
    fn test_mid_project_behind_schedule() {
        let tasks = vec![task(vec![
            todo(4.0, day(10)).completed_on(day(10)),
            todo(6.0, day(25)),
        ])];

        let report = ProgressAnalyzer::default()
            .analyze(&tasks, Some(day(1)), Some(day(31)), day(16))
            .unwrap();

        assert_eq!(report.total_estimated_hours, 10.0);
        assert_eq!(report.completed_hours, 4.0);
        assert_eq!(report.progress_rate, 40);
        assert_eq!(report.time_elapsed_rate, 50);
        assert_eq!(report.delay_rate, -10);
        assert_eq!(report.buffer_hours, 2.0);
        assert_eq!(report.remaining_buffer_hours, 2.0);
    }

    #[test]
    fn test_progress_rate_stays_within_bounds() {
        let tasks = vec![task(vec![
            todo(0.0, day(5)).completed_on(day(5)),
            todo(3.0, day(6)).completed_on(day(6)),
            todo(0.5, day(7)).completed_on(day(7)),
        ])];
        let report = ProgressAnalyzer::default().analyze(&tasks, None, None, day(8)).unwrap();
        assert_eq!(report.progress_rate, 100);

        let tasks = vec![task(vec![todo(0.0, day(5)), todo(0.0, day(6))])];
        let report = ProgressAnalyzer::default().analyze(&tasks, None, None, day(8)).unwrap();
        assert_eq!(report.progress_rate, 0);
    }

    #[test]
    fn test_elapsed_rate_is_clamped_and_guarded() {
        assert_eq!(time_elapsed_rate(Some(day(10)), Some(day(20)), day(1)), 0);
        assert_eq!(time_elapsed_rate(Some(day(10)), Some(day(20)), day(31)), 100);
        assert_eq!(time_elapsed_rate(Some(day(10)), Some(day(10)), day(10)), 0);
        assert_eq!(time_elapsed_rate(Some(day(20)), Some(day(10)), day(15)), 0);
        assert_eq!(time_elapsed_rate(None, Some(day(10)), day(5)), 0);
    }

    #[test]
    fn test_overdue_todos_consume_buffer() {
        let tasks = vec![task(vec![
            todo(40.0, day(2)).completed_on(day(2)),
            // Three whole days late: 24h charged.
            todo(10.0, day(12)),
            // Due the same morning: listed but charged nothing.
            todo(10.0, day(15) + Duration::hours(1)),
            todo(40.0, day(20)),
        ])];

        let report = ProgressAnalyzer::default()
            .analyze(&tasks, Some(day(1)), Some(day(31)), day(15) + Duration::hours(5))
            .unwrap();

        assert_eq!(report.buffer_hours, 20.0);
        assert_eq!(report.delayed_hours, 24.0);
        assert_eq!(report.remaining_buffer_hours, 0.0);
        assert_eq!(report.delayed_todo_ids.len(), 2);
        assert_eq!(report.delayed_todo_ids[0], tasks[0].todos[1].id);
    }

    #[test]
    fn test_custom_constants() {
        let tasks = vec![task(vec![todo(100.0, day(10))])];
        let report = ProgressAnalyzer::new(0.5, 4.0)
            .analyze(&tasks, None, None, day(12))
            .unwrap();
        assert_eq!(report.buffer_hours, 50.0);
        assert_eq!(report.delayed_hours, 8.0);
        assert_eq!(report.remaining_buffer_hours, 42.0);
    }
}
