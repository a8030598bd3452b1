//! One-call assessment over a snapshot.

use std::sync::Arc;
use serde::Serialize;
use tracing::info;
use workpulse_core::{EngineConfig, Period, Snapshot, Time};
use workpulse_storage::CapacityStore;
use crate::capacity::{TeamCapacityAnalyzer, WorkloadReport};
use crate::error::Result;
use crate::period::{PeriodCalculator, PeriodSelector};
use crate::progress::{ProgressAnalyzer, ProgressReport};
use crate::registry::CapacityRegistry;
use crate::risk::{HealthStatus, OverdueSummary, PaceStatus, RiskClassifier, RiskLevel};

/// Everything the dashboard shows for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    /// Window the workload was measured over
    pub period: Period,
    /// Team workload
    pub workload: WorkloadReport,
    /// Project progress
    pub progress: ProgressReport,
    /// Pace label
    pub pace: PaceStatus,
    /// Health label
    pub health: HealthStatus,
    /// Overdue facts behind `risk`
    pub overdue: OverdueSummary,
    /// Risk label
    pub risk: RiskLevel,
}

/// Wires the analyzers together from one configuration.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    registry: CapacityRegistry,
    periods: PeriodCalculator,
    team: TeamCapacityAnalyzer,
    progress: ProgressAnalyzer,
}

impl AssessmentEngine {
    /// Build an engine over a capacity store.
    pub fn new(config: &EngineConfig, store: Arc<dyn CapacityStore>) -> Result<Self> {
        config.validate()?;
        let registry = CapacityRegistry::new(store, config.default_daily_hours);
        let periods = PeriodCalculator::from_config(config);
        Ok(Self {
            team: TeamCapacityAnalyzer::new(registry.clone(), periods.clone()),
            progress: ProgressAnalyzer::from_config(config),
            registry,
            periods,
        })
    }

    /// The capacity registry the engine reads.
    pub fn registry(&self) -> &CapacityRegistry {
        &self.registry
    }

    /// Workload of the snapshot's roster over the selected period.
    pub fn workload(
        &self,
        snapshot: &Snapshot,
        selector: &PeriodSelector,
        now: Time,
    ) -> Result<WorkloadReport> {
        snapshot.validate()?;
        let period = self.periods.resolve_period(selector, now)?;
        self.team.analyze(&snapshot.project_tasks(), &snapshot.members, &period)
    }

    /// Progress of the snapshot's project as of `now`.
    pub fn progress(&self, snapshot: &Snapshot, now: Time) -> Result<ProgressReport> {
        snapshot.validate()?;
        self.progress.analyze(
            &snapshot.project_tasks(),
            snapshot.project.start_date,
            snapshot.project.end_date,
            now,
        )
    }

    /// Full assessment: workload, progress and all three labels.
    pub fn assess(
        &self,
        snapshot: &Snapshot,
        selector: &PeriodSelector,
        now: Time,
    ) -> Result<Assessment> {
        snapshot.validate()?;
        let tasks = snapshot.project_tasks();
        let period = self.periods.resolve_period(selector, now)?;

        let workload = self.team.analyze(&tasks, &snapshot.members, &period)?;
        let progress = self.progress.analyze(
            &tasks,
            snapshot.project.start_date,
            snapshot.project.end_date,
            now,
        )?;
        let overdue = OverdueSummary::from_tasks(&tasks, now);

        let assessment = Assessment {
            period,
            pace: RiskClassifier::pace_status(progress.delay_rate),
            health: RiskClassifier::health_of(&progress),
            risk: RiskClassifier::risk_level(&overdue),
            overdue,
            workload,
            progress,
        };

        info!(
            "Assessed project {}: pace {}, health {}, risk {}",
            snapshot.project.id,
            assessment.pace.as_str(),
            assessment.health.as_str(),
            assessment.risk.as_str()
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use workpulse_core::{MemberId, Project, Task, TaskId, Todo, ValidationError};
    use workpulse_storage::MemoryCapacityStore;
    use crate::error::EngineError;

    fn day(d: u32) -> Time {
        Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap()
    }

    fn engine() -> AssessmentEngine {
        AssessmentEngine::new(&EngineConfig::default(), Arc::new(MemoryCapacityStore::new())).unwrap()
    }

    fn todo(hours: f64, start: u32, end: u32) -> Todo {
        Todo::new(TaskId::new(), hours, day(start), day(end))
    }

    // January 2024 project, assessed on the 16th (day 15 of 30).
    fn snapshot() -> Snapshot {
        let project = Project::new("Launch", day(1), day(31));
        let design = Task::new(project.id.clone(), "Design")
            .with_todo(todo(16.0, 2, 5).assigned_to("alice").completed_on(day(5)))
            .with_todo(todo(24.0, 8, 12).assigned_to("bob").completed_on(day(12)));
        let build = Task::new(project.id.clone(), "Build")
            .with_todo(todo(20.0, 15, 19).assigned_to("alice"))
            .with_todo(todo(20.0, 16, 19).assigned_to("bob"))
            .with_todo(todo(10.0, 17, 18))
            .with_todo(todo(10.0, 22, 26).assigned_to("alice"));
        let elsewhere = Task::new("other-project".into(), "Noise")
            .with_todo(todo(500.0, 16, 17).assigned_to("alice"));
        Snapshot {
            project,
            members: vec![MemberId::new("alice"), MemberId::new("bob"), MemberId::new("carol")],
            tasks: vec![design, build, elsewhere],
        }
    }

    #[test]
    fn test_end_to_end_assessment() {
        let engine = engine();
        let snapshot = snapshot();

        let assessment = engine.assess(&snapshot, &PeriodSelector::Week, day(16)).unwrap();

        // 40 of 100 estimated hours are done; half the schedule has passed.
        assert_eq!(assessment.progress.progress_rate, 40);
        assert_eq!(assessment.progress.time_elapsed_rate, 50);
        assert_eq!(assessment.progress.delay_rate, -10);
        assert_eq!(assessment.pace, PaceStatus::SlightDelay);
        assert_eq!(assessment.health, HealthStatus::Normal);
        assert_eq!(assessment.risk, RiskLevel::Low);

        // Week of Mon 15th: alice 20h and bob 20h of 40h each, carol idle.
        let workload = &assessment.workload;
        assert_eq!(workload.workable_days, 5);
        assert_eq!(workload.members.len(), 3);
        assert_eq!(workload.members[0].workload_percentage, 50);
        assert_eq!(workload.members[1].workload_percentage, 50);
        assert_eq!(workload.members[2].assigned_todo_count, 0);
        assert_eq!(workload.team.total_workable_hours, 80.0);
        assert_eq!(workload.team.available_hours, 40.0);
        assert_eq!(workload.team.unassigned_hours, 10.0);
        assert_eq!(workload.team.unassigned_absorption_percentage, 25);
    }

    #[test]
    fn test_overrides_persist_across_calls() {
        let engine = engine();
        let snapshot = snapshot();
        engine.registry().set_daily_hours(&MemberId::new("alice"), 6.0).unwrap();

        let first = engine.workload(&snapshot, &PeriodSelector::Week, day(16)).unwrap();
        let second = engine.workload(&snapshot, &PeriodSelector::Week, day(16)).unwrap();

        assert_eq!(first.members[0].workable_hours, 30.0);
        assert_eq!(first.members[0].workload_percentage, 67);
        assert_eq!(first, second);
        assert_eq!(engine.registry().get_daily_hours(&MemberId::new("alice")), 6.0);
    }

    #[test]
    fn test_late_project_turns_red() {
        let engine = engine();
        let snapshot = snapshot();

        // Three weeks on: the build todos are days overdue.
        let now = day(26) + Duration::hours(10);
        let assessment = engine.assess(&snapshot, &PeriodSelector::Month, now).unwrap();

        assert_eq!(assessment.progress.delayed_todo_ids.len(), 4);
        assert_eq!(assessment.progress.remaining_buffer_hours, 0.0);
        assert_eq!(assessment.health, HealthStatus::Danger);
        assert_eq!(assessment.risk, RiskLevel::High);
        assert_eq!(assessment.pace, PaceStatus::Delayed);
    }

    #[test]
    fn test_lifetime_period_uses_project_dates() {
        let engine = engine();
        let snapshot = snapshot();
        let report = engine
            .workload(&snapshot, &PeriodSelector::lifetime(&snapshot.project), day(16))
            .unwrap();
        assert_eq!(report.workable_days, 23);
        assert_eq!(report.members[0].assigned_hours, 30.0);
    }

    #[test]
    fn test_invalid_snapshot_produces_no_report() {
        let engine = engine();
        let mut snapshot = snapshot();
        snapshot.tasks[1].todos[0].estimated_hours = -5.0;

        let err = engine.assess(&snapshot, &PeriodSelector::Week, day(16)).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::InvalidHours { .. })));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            default_daily_hours: -1.0,
            ..Default::default()
        };
        let result = AssessmentEngine::new(&config, Arc::new(MemoryCapacityStore::new()));
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }
}
