//! Time windows the workload is measured over.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use crate::Time;

/// A window with both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First instant
    pub start: Time,
    /// Last instant
    pub end: Time,
}

impl Period {
    /// Build a period from its bounds, taken verbatim.
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Whether `t` falls on one of the window's calendar days.
    ///
    /// Bounds count as whole days, matching `days()`.
    pub fn contains_day(&self, t: Time) -> bool {
        (self.start.date_naive()..=self.end.date_naive()).contains(&t.date_naive())
    }

    /// Every calendar day touched by the window, in order.
    ///
    /// Empty when the window is inverted.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date_naive();
        let last = self.end.date_naive();
        std::iter::successors(Some(first), |day| day.checked_add_days(Days::new(1)))
            .take_while(move |day| *day <= last)
    }
}
