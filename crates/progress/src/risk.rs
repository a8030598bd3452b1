//! Status classification.
//!
//! Three schemes answer "is this project in trouble" with different inputs
//! and thresholds. They are kept separate on purpose and are not reconciled
//! with one another:
//! - pace status: four-way, from the delay rate alone
//! - health status: four-way, from delay, buffer and progress
//! - risk level: three-way, from overdue hours and the overdue share

use serde::Serialize;
use workpulse_core::{Task, Time};
use crate::progress::ProgressReport;

/// Schedule pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaceStatus {
    /// More than 5 points ahead
    Ahead,
    /// Within 5 points either way
    OnTrack,
    /// 5 to 15 points behind
    SlightDelay,
    /// More than 15 points behind
    Delayed,
}

impl PaceStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaceStatus::Ahead => "ahead",
            PaceStatus::OnTrack => "on-track",
            PaceStatus::SlightDelay => "slight-delay",
            PaceStatus::Delayed => "delayed",
        }
    }
}

/// Overall project health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    /// Nearly done and not racing ahead
    Good,
    /// Nothing notable
    Normal,
    /// Buffer running low or delay rate elevated
    Warning,
    /// Buffer exhausted or delay rate extreme
    Danger,
}

impl HealthStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Good => "good",
            HealthStatus::Normal => "normal",
            HealthStatus::Warning => "warning",
            HealthStatus::Danger => "danger",
        }
    }
}

/// Per-project risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    /// Little overdue work
    Low,
    /// Noticeable overdue work
    Medium,
    /// Heavy overdue work
    High,
}

impl RiskLevel {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Overdue facts for the risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverdueSummary {
    /// Hours elapsed past each overdue todo's end, summed
    pub overdue_hours: f64,
    /// Open todos past their scheduled end
    pub overdue_count: usize,
    /// Open todos
    pub incomplete_count: usize,
}

impl OverdueSummary {
    /// Summarize the open todos of `tasks` as of `now`.
    pub fn from_tasks(tasks: &[Task], now: Time) -> Self {
        tasks
            .iter()
            .flat_map(|task| task.todos.iter())
            .filter(|todo| !todo.completed)
            .fold(Self::default(), |mut acc, todo| {
                acc.incomplete_count += 1;
                if todo.is_overdue(now) {
                    acc.overdue_count += 1;
                    acc.overdue_hours += (now - todo.scheduled_end).num_seconds() as f64 / 3600.0;
                }
                acc
            })
    }

    /// Overdue share of open todos, 0 when nothing is open.
    pub fn overdue_ratio(&self) -> f64 {
        if self.incomplete_count == 0 {
            0.0
        } else {
            self.overdue_count as f64 / self.incomplete_count as f64
        }
    }
}

/// Maps metrics to status labels with fixed thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier;

impl RiskClassifier {
    /// Pace from the delay rate.
    pub fn pace_status(delay_rate: i64) -> PaceStatus {
        if delay_rate > 5 {
            PaceStatus::Ahead
        } else if delay_rate >= -5 {
            PaceStatus::OnTrack
        } else if delay_rate >= -15 {
            PaceStatus::SlightDelay
        } else {
            PaceStatus::Delayed
        }
    }

    /// Health from delay, buffer and progress. First matching rule wins.
    ///
    /// The delay-rate rules trigger on large positive values, the opposite
    /// sign from `pace_status`.
    pub fn health_status(
        delay_rate: i64,
        buffer_hours: f64,
        remaining_buffer_hours: f64,
        progress_rate: i64,
    ) -> HealthStatus {
        let has_buffer = buffer_hours > 0.0;
        if delay_rate >= 25 || (has_buffer && remaining_buffer_hours == 0.0) {
            HealthStatus::Danger
        } else if delay_rate >= 10 || (has_buffer && remaining_buffer_hours < buffer_hours * 0.3) {
            HealthStatus::Warning
        } else if progress_rate >= 80 && delay_rate < 5 {
            HealthStatus::Good
        } else {
            HealthStatus::Normal
        }
    }

    /// Health of a progress report.
    pub fn health_of(report: &ProgressReport) -> HealthStatus {
        Self::health_status(
            report.delay_rate,
            report.buffer_hours,
            report.remaining_buffer_hours,
            report.progress_rate,
        )
    }

    /// Risk level from overdue hours, then from the overdue share.
    pub fn risk_level(summary: &OverdueSummary) -> RiskLevel {
        let ratio = summary.overdue_ratio();
        if summary.overdue_hours > 40.0 {
            RiskLevel::High
        } else if summary.overdue_hours > 20.0 {
            RiskLevel::Medium
        } else if ratio > 0.5 {
            RiskLevel::High
        } else if ratio > 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}
