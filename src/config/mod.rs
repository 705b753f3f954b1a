//! Run configuration and validation.

use chrono::Weekday;
use thiserror::Error;

use crate::models::MINUTES_PER_DAY;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("day of week \"{0}\" is outside range (0-6, Monday is 0, or a day name)")]
    DayOutOfRange(String),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Options consumed by the pairing engine. Defaults match the reference
/// program: Saturday, one point of score gap, 30-minute spacing, nothing
/// before noon.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Which day's availability is consulted
    pub day: Weekday,

    /// Inclusive upper bound on the score gap between opponents
    pub max_point_difference: f32,

    /// Minimum spacing between matches and minimum usable match duration,
    /// in minutes
    pub min_time_gap: u16,

    /// Earliest schedulable time as a fractional hour (12.5 is 12:30)
    pub earliest_time: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            day: Weekday::Sat,
            max_point_difference: 1.0,
            min_time_gap: 30,
            earliest_time: 12.0,
        }
    }
}

impl RunConfig {
    /// Validate option ranges before the engine runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_point_difference < 0.0 {
            return Err(ConfigError::Validation(format!(
                "maximum point difference must be non-negative, got {}",
                self.max_point_difference
            )));
        }
        if !(0.0..24.0).contains(&self.earliest_time) {
            return Err(ConfigError::Validation(format!(
                "earliest time must be within [0, 24), got {}",
                self.earliest_time
            )));
        }
        if self.min_time_gap > MINUTES_PER_DAY {
            return Err(ConfigError::Validation(format!(
                "minimum time gap must fit within a day, got {} minutes",
                self.min_time_gap
            )));
        }
        Ok(())
    }

    /// Earliest schedulable time as a minute-of-day value.
    pub fn earliest_minute(&self) -> u16 {
        (self.earliest_time * 60.0).round() as u16
    }
}

/// Parse a day-of-week option: a digit 0-6 (Monday is 0) or a day name
/// understood by chrono ("sat", "saturday", ...).
pub fn parse_day(s: &str) -> Result<Weekday, ConfigError> {
    if let Ok(n) = s.parse::<u8>() {
        return match n {
            0 => Ok(Weekday::Mon),
            1 => Ok(Weekday::Tue),
            2 => Ok(Weekday::Wed),
            3 => Ok(Weekday::Thu),
            4 => Ok(Weekday::Fri),
            5 => Ok(Weekday::Sat),
            6 => Ok(Weekday::Sun),
            _ => Err(ConfigError::DayOutOfRange(s.to_string())),
        };
    }
    s.parse::<Weekday>()
        .map_err(|_| ConfigError::DayOutOfRange(s.to_string()))
}
