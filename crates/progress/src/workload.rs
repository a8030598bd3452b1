//! Remaining-commitment aggregation.

use std::collections::BTreeMap;
use serde::Serialize;
use workpulse_core::{MemberId, Period, Task};

/// Open work held by one member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemberLoad {
    /// Sum of estimated hours
    pub hours: f64,
    /// Number of todos contributing
    pub todo_count: usize,
}

/// Result of aggregating open todos over a period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignedHours {
    /// Load per assignee
    pub by_member: BTreeMap<MemberId, MemberLoad>,
    /// Hours of todos nobody is assigned to
    pub unassigned_hours: f64,
    /// Count of unassigned todos
    pub unassigned_todo_count: usize,
}

impl AssignedHours {
    /// Hours assigned to `member`, zero if none.
    pub fn hours_for(&self, member: &MemberId) -> f64 {
        self.by_member.get(member).map_or(0.0, |load| load.hours)
    }

    /// Sum over all assignees.
    pub fn total_assigned_hours(&self) -> f64 {
        self.by_member.values().map(|load| load.hours).sum()
    }
}

/// Sums estimated hours of incomplete todos anchored inside a period.
///
/// Completed todos never count: workload is remaining commitment, not
/// historical effort.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkloadAggregator;

impl WorkloadAggregator {
    /// Create an aggregator.
    pub fn new() -> Self {
        Self
    }

    /// Bucket open todos whose scheduled start falls on a day of `period` by assignee.
    pub fn aggregate_assigned_hours(&self, tasks: &[Task], period: &Period) -> AssignedHours {
        let mut result = AssignedHours::default();

        let open_in_period = tasks
            .iter()
            .flat_map(|task| task.todos.iter())
            .filter(|todo| !todo.completed && period.contains_day(todo.scheduled_start));

        for todo in open_in_period {
            match todo.assignee() {
                Some(member) => {
                    let load = result.by_member.entry(member.clone()).or_default();
                    load.hours += todo.estimated_hours;
                    load.todo_count += 1;
                }
                None => {
                    result.unassigned_hours += todo.estimated_hours;
                    result.unassigned_todo_count += 1;
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use workpulse_core::{ProjectId, TaskId, Time, Todo};

    fn at(day: u32) -> Time {
        Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap()
    }

    fn todo(hours: f64, day: u32) -> Todo {
        Todo::new(TaskId::new(), hours, at(day), at(day))
    }

    fn week() -> Period {
        Period::new(
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 14, 23, 59, 59).unwrap(),
        )
    }

    #[test]
    fn test_sums_by_assignee_and_unassigned() {
        let task = Task::new(ProjectId::from("p"), "Build")
            .with_todo(todo(3.0, 8).assigned_to("alice"))
            .with_todo(todo(2.5, 9).assigned_to("alice"))
            .with_todo(todo(4.0, 10).assigned_to("bob"))
            .with_todo(todo(1.0, 11))
            .with_todo(todo(2.0, 12).assigned_to(""));

        let result = WorkloadAggregator::new().aggregate_assigned_hours(&[task], &week());

        assert_eq!(result.hours_for(&MemberId::new("alice")), 5.5);
        assert_eq!(result.by_member[&MemberId::new("alice")].todo_count, 2);
        assert_eq!(result.hours_for(&MemberId::new("bob")), 4.0);
        assert_eq!(result.unassigned_hours, 3.0);
        assert_eq!(result.unassigned_todo_count, 2);
        assert_eq!(result.total_assigned_hours(), 9.5);
    }

    #[test]
    fn test_completed_todos_never_count() {
        let task = Task::new(ProjectId::from("p"), "Build")
            .with_todo(todo(3.0, 8).assigned_to("alice").completed_on(at(9)))
            .with_todo(todo(6.0, 10).completed_on(at(10)));

        let result = WorkloadAggregator::new().aggregate_assigned_hours(&[task], &week());

        assert!(result.by_member.is_empty());
        assert_eq!(result.unassigned_hours, 0.0);
    }

    #[test]
    fn test_todos_outside_period_are_skipped() {
        let task = Task::new(ProjectId::from("p"), "Build")
            .with_todo(todo(3.0, 7).assigned_to("alice"))
            .with_todo(todo(5.0, 15).assigned_to("alice"))
            .with_todo(todo(1.0, 14).assigned_to("alice"));

        let result = WorkloadAggregator::new().aggregate_assigned_hours(&[task], &week());

        assert_eq!(result.hours_for(&MemberId::new("alice")), 1.0);
    }

    #[test]
    fn test_flattens_across_tasks() {
        let a = Task::new(ProjectId::from("p"), "A").with_todo(todo(2.0, 8).assigned_to("alice"));
        let b = Task::new(ProjectId::from("p"), "B").with_todo(todo(3.0, 9).assigned_to("alice"));

        let result = WorkloadAggregator::new().aggregate_assigned_hours(&[a, b], &week());

        assert_eq!(result.hours_for(&MemberId::new("alice")), 5.0);
    }

    #[test]
    fn test_bounds_inside_a_day_keep_that_days_todos() {
        let period = Period::new(
            Utc.with_ymd_and_hms(2024, 1, 8, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 12, 12, 0, 0).unwrap(),
        );
        let task = Task::new(ProjectId::from("p"), "Build")
            .with_todo(
                Todo::new(TaskId::new(), 8.0, Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap(), at(8))
                    .assigned_to("alice"),
            )
            .with_todo(
                Todo::new(TaskId::new(), 8.0, Utc.with_ymd_and_hms(2024, 1, 12, 15, 0, 0).unwrap(), at(13))
                    .assigned_to("alice"),
            );

        let result = WorkloadAggregator::new().aggregate_assigned_hours(&[task], &period);

        assert_eq!(result.hours_for(&MemberId::new("alice")), 16.0);
    }
}
