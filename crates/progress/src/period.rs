//! Period resolution and workable-day counting.

use std::sync::Arc;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use workpulse_core::{EngineConfig, Period, Project, Time};
use crate::error::{EngineError, Result};

/// Decides which calendar days count as workable.
///
/// The weekday rule is the only calendar shipped; a holiday-aware calendar
/// can be plugged into `PeriodCalculator` without touching the analyzers.
pub trait WorkdayCalendar: Send + Sync {
    /// Whether work can be scheduled on `day`.
    fn is_workable(&self, day: NaiveDate) -> bool;
}

/// Workable days are a fixed set of weekdays.
#[derive(Debug, Clone)]
pub struct WeekdayCalendar {
    workable: Vec<Weekday>,
}

impl WeekdayCalendar {
    /// Calendar over the given weekdays.
    pub fn new(workable: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            workable: workable.into_iter().collect(),
        }
    }
}

impl Default for WeekdayCalendar {
    fn default() -> Self {
        Self::new([Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri])
    }
}

impl WorkdayCalendar for WeekdayCalendar {
    fn is_workable(&self, day: NaiveDate) -> bool {
        self.workable.contains(&day.weekday())
    }
}

/// Which window to measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum PeriodSelector {
    /// The week containing the anchor
    Week,
    /// The calendar month containing the anchor
    Month,
    /// An explicit range, used verbatim
    Custom {
        /// Range bounds
        range: Period,
    },
    /// From project start to project end
    Lifetime {
        /// Project start
        start: Option<Time>,
        /// Project end
        end: Option<Time>,
    },
}

impl PeriodSelector {
    /// Explicit range.
    pub fn custom(start: Time, end: Time) -> Self {
        Self::Custom {
            range: Period::new(start, end),
        }
    }

    /// The lifetime of `project`.
    pub fn lifetime(project: &Project) -> Self {
        Self::Lifetime {
            start: project.start_date,
            end: project.end_date,
        }
    }
}

/// Turns selectors into concrete periods and counts workable days.
#[derive(Clone)]
pub struct PeriodCalculator {
    calendar: Arc<dyn WorkdayCalendar>,
    week_start: Weekday,
}

impl PeriodCalculator {
    /// Calculator over a calendar, with weeks starting on `week_start`.
    pub fn new(calendar: Arc<dyn WorkdayCalendar>, week_start: Weekday) -> Self {
        Self {
            calendar,
            week_start,
        }
    }

    /// Calculator using the configured weekdays and week start.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Arc::new(WeekdayCalendar::new(config.workable_weekdays.iter().copied())),
            config.week_start,
        )
    }

    /// Resolve a selector against `anchor`.
    ///
    /// Week, month and lifetime periods cover whole calendar days; custom
    /// ranges are returned exactly as given, even when inverted.
    pub fn resolve_period(&self, selector: &PeriodSelector, anchor: Time) -> Result<Period> {
        match selector {
            PeriodSelector::Week => {
                let day = anchor.date_naive();
                let offset = (7 + day.weekday().num_days_from_monday()
                    - self.week_start.num_days_from_monday())
                    % 7;
                let first = day - Duration::days(i64::from(offset));
                let last = first + Duration::days(6);
                Ok(Period::new(start_of_day(first), end_of_day(last)))
            }
            PeriodSelector::Month => {
                let first = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1)
                    .ok_or_else(|| EngineError::InvalidPeriod(format!("no month for {anchor}")))?;
                let (year, month) = if first.month() == 12 {
                    (first.year() + 1, 1)
                } else {
                    (first.year(), first.month() + 1)
                };
                let next = NaiveDate::from_ymd_opt(year, month, 1)
                    .ok_or_else(|| EngineError::InvalidPeriod(format!("no month after {first}")))?;
                Ok(Period::new(start_of_day(first), end_of_day(next - Duration::days(1))))
            }
            PeriodSelector::Custom { range } => Ok(*range),
            PeriodSelector::Lifetime { start, end } => match (start, end) {
                (Some(start), Some(end)) => Ok(Period::new(
                    start_of_day(start.date_naive()),
                    end_of_day(end.date_naive()),
                )),
                _ => Err(EngineError::InvalidPeriod(
                    "project lifetime needs both a start and an end date".to_string(),
                )),
            },
        }
    }

    /// Count workable days from `period.start` to `period.end`, both days
    /// inclusive. Zero for an inverted period.
    pub fn count_workable_days(&self, period: &Period) -> u32 {
        period
            .days()
            .filter(|day| self.calendar.is_workable(*day))
            .count() as u32
    }
}

impl std::fmt::Debug for PeriodCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodCalculator")
            .field("week_start", &self.week_start)
            .finish_non_exhaustive()
    }
}

impl Default for PeriodCalculator {
    fn default() -> Self {
        Self::new(Arc::new(WeekdayCalendar::default()), Weekday::Mon)
    }
}

fn start_of_day(day: NaiveDate) -> Time {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

fn end_of_day(day: NaiveDate) -> Time {
    start_of_day(day) + Duration::days(1) - Duration::nanoseconds(1)
}
