//! Team capacity analysis.

use std::collections::HashSet;
use serde::Serialize;
use tracing::debug;
use workpulse_core::{validate_tasks, MemberId, Period, Task};
use crate::error::Result;
use crate::percent;
use crate::period::PeriodCalculator;
use crate::registry::CapacityRegistry;
use crate::workload::WorkloadAggregator;

/// Workload severity band shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkloadBand {
    /// Below 70%
    Low,
    /// 70% up to 100%
    Medium,
    /// 100% and above
    High,
}

impl WorkloadBand {
    /// Band for a workload percentage.
    pub fn from_percentage(percentage: i64) -> Self {
        if percentage < 70 {
            WorkloadBand::Low
        } else if percentage < 100 {
            WorkloadBand::Medium
        } else {
            WorkloadBand::High
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadBand::Low => "low",
            WorkloadBand::Medium => "medium",
            WorkloadBand::High => "high",
        }
    }
}

/// One member's load over the period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberWorkload {
    /// The member
    pub member_id: MemberId,
    /// Open estimated hours assigned in the period
    pub assigned_hours: f64,
    /// Number of open todos assigned in the period
    pub assigned_todo_count: usize,
    /// Resolved daily capacity
    pub daily_hours: f64,
    /// Daily capacity times workable days
    pub workable_hours: f64,
    /// Assigned over workable, 100 when there is no capacity
    pub workload_percentage: i64,
    /// Severity band of `workload_percentage`
    pub band: WorkloadBand,
}

/// Team aggregates, over members holding at least one assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWorkload {
    /// Sum of workable hours
    pub total_workable_hours: f64,
    /// Sum of assigned hours
    pub total_assigned_hours: f64,
    /// Spare hours, never negative
    pub available_hours: f64,
    /// Hours nobody is assigned to
    pub unassigned_hours: f64,
    /// Unassigned hours over spare hours, 100 when nothing is spare
    pub unassigned_absorption_percentage: i64,
    /// Team-wide assigned over workable
    pub workload_percentage: i64,
    /// Severity band of `workload_percentage`
    pub band: WorkloadBand,
}

/// Workload of a team over one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadReport {
    /// Measured window
    pub period: Period,
    /// Workable days in the window
    pub workable_days: u32,
    /// Per-member rows
    pub members: Vec<MemberWorkload>,
    /// Team aggregates
    pub team: TeamWorkload,
}

/// Combines capacity, calendar and assignments into a workload report.
#[derive(Debug, Clone)]
pub struct TeamCapacityAnalyzer {
    registry: CapacityRegistry,
    periods: PeriodCalculator,
    aggregator: WorkloadAggregator,
}

impl TeamCapacityAnalyzer {
    /// Create an analyzer.
    pub fn new(registry: CapacityRegistry, periods: PeriodCalculator) -> Self {
        Self {
            registry,
            periods,
            aggregator: WorkloadAggregator::new(),
        }
    }

    /// Analyze `tasks` for the roster `member_ids` over `period`.
    ///
    /// Rows follow roster order; assignees missing from the roster are
    /// appended so their hours are not dropped. Team totals only include
    /// members with at least one assigned todo in the period, so idle roster
    /// members do not add spare capacity.
    pub fn analyze(
        &self,
        tasks: &[Task],
        member_ids: &[MemberId],
        period: &Period,
    ) -> Result<WorkloadReport> {
        validate_tasks(tasks)?;

        let workable_days = self.periods.count_workable_days(period);
        let assigned = self.aggregator.aggregate_assigned_hours(tasks, period);

        let mut seen = HashSet::new();
        let roster = member_ids
            .iter()
            .chain(assigned.by_member.keys())
            .filter(|id| !id.is_empty() && seen.insert((*id).clone()));

        let members: Vec<MemberWorkload> = roster
            .map(|member_id| {
                let load = assigned.by_member.get(member_id).copied().unwrap_or_default();
                let daily_hours = self.registry.get_daily_hours(member_id);
                let workable_hours = daily_hours * f64::from(workable_days);
                let workload_percentage = percent(load.hours, workable_hours, 100);
                MemberWorkload {
                    member_id: member_id.clone(),
                    assigned_hours: load.hours,
                    assigned_todo_count: load.todo_count,
                    daily_hours,
                    workable_hours,
                    workload_percentage,
                    band: WorkloadBand::from_percentage(workload_percentage),
                }
            })
            .collect();

        let holding: Vec<&MemberWorkload> =
            members.iter().filter(|m| m.assigned_todo_count > 0).collect();
        let total_workable_hours: f64 = holding.iter().map(|m| m.workable_hours).sum();
        let total_assigned_hours: f64 = holding.iter().map(|m| m.assigned_hours).sum();
        let available_hours = (total_workable_hours - total_assigned_hours).max(0.0);
        let workload_percentage = if holding.is_empty() {
            0
        } else {
            percent(total_assigned_hours, total_workable_hours, 100)
        };

        let team = TeamWorkload {
            total_workable_hours,
            total_assigned_hours,
            available_hours,
            unassigned_hours: assigned.unassigned_hours,
            unassigned_absorption_percentage: percent(assigned.unassigned_hours, available_hours, 100),
            workload_percentage,
            band: WorkloadBand::from_percentage(workload_percentage),
        };

        debug!(
            "Workload over {} workable days: {} members, {:.1}h assigned, {:.1}h unassigned",
            workable_days,
            members.len(),
            team.total_assigned_hours,
            team.unassigned_hours
        );

        Ok(WorkloadReport {
            period: *period,
            workable_days,
            members,
            team,
        })
    }
}
