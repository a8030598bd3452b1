//! Capacity and risk assessment (Layer 3)
//!
//! Aggregates scheduling facts from tasks and todos into workload, progress,
//! delay and buffer metrics, and classifies them into status labels.

#![warn(missing_docs)]

pub mod error;
pub mod registry;
pub mod period;
pub mod workload;
pub mod capacity;
pub mod progress;
pub mod risk;
pub mod engine;

pub use error::{EngineError, Result};
pub use registry::CapacityRegistry;
pub use period::{PeriodCalculator, PeriodSelector, WeekdayCalendar, WorkdayCalendar};
pub use workload::{AssignedHours, MemberLoad, WorkloadAggregator};
pub use capacity::{MemberWorkload, TeamCapacityAnalyzer, TeamWorkload, WorkloadBand, WorkloadReport};
pub use progress::{ProgressAnalyzer, ProgressReport};
pub use risk::{HealthStatus, OverdueSummary, PaceStatus, RiskClassifier, RiskLevel};
pub use engine::{Assessment, AssessmentEngine};

/// `numerator / denominator` as a whole percentage, or `fallback` when the
/// denominator is not positive. Halves round up, negatives included.
pub(crate) fn percent(numerator: f64, denominator: f64, fallback: i64) -> i64 {
    if denominator > 0.0 {
        (numerator / denominator * 100.0 + 0.5).floor() as i64
    } else {
        fallback
    }
}
