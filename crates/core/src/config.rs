//! Engine configuration.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use crate::error::ValidationError;

/// Tunables consumed by the capacity and progress analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Daily hours for members without an override
    pub default_daily_hours: f64,

    /// Share of the total estimate held back as schedule contingency
    pub buffer_ratio: f64,

    /// Hours charged per day of lateness when consuming the buffer
    pub overdue_hours_per_day: f64,

    /// Days of the week that count as workable
    pub workable_weekdays: Vec<Weekday>,

    /// First day of a "week" period
    pub week_start: Weekday,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_daily_hours: 8.0,
            buffer_ratio: 0.20,
            overdue_hours_per_day: 8.0,
            workable_weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            week_start: Weekday::Mon,
        }
    }
}

impl EngineConfig {
    /// Reject values the analyzers cannot work with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.default_daily_hours.is_finite() || self.default_daily_hours < 0.0 {
            return Err(ValidationError::InvalidConfig(format!(
                "default_daily_hours must be >= 0, got {}",
                self.default_daily_hours
            )));
        }
        if !(0.0..=1.0).contains(&self.buffer_ratio) {
            return Err(ValidationError::InvalidConfig(format!(
                "buffer_ratio must be within [0, 1], got {}",
                self.buffer_ratio
            )));
        }
        if !self.overdue_hours_per_day.is_finite() || self.overdue_hours_per_day < 0.0 {
            return Err(ValidationError::InvalidConfig(format!(
                "overdue_hours_per_day must be >= 0, got {}",
                self.overdue_hours_per_day
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workable_weekdays.len(), 5);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "default_daily_hours": 6.5 }"#).unwrap();
        assert_eq!(config.default_daily_hours, 6.5);
        assert_eq!(config.buffer_ratio, 0.20);
        assert_eq!(config.week_start, Weekday::Mon);
    }

    #[test]
    fn test_out_of_range_buffer_ratio() {
        let config = EngineConfig {
            buffer_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidConfig(_))));
    }
}
