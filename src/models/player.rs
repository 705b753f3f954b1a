//! Player model — one roster entry with score, history, and availability.

use std::collections::HashSet;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::timeset::TimeSet;

/// Player identifier, assigned from the roster file (or defaulted to the
/// player's ordinal position when missing).
pub type PlayerId = u32;

/// Days of the week, Monday first.
pub const DAYS_PER_WEEK: usize = 7;

/// One `TimeSet` per day of the week, Monday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekSchedule {
    days: [TimeSet; DAYS_PER_WEEK],
}

impl WeekSchedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Availability for one day of the week.
    pub fn day(&self, day: Weekday) -> &TimeSet {
        &self.days[day.num_days_from_monday() as usize]
    }

    /// Mutable availability for one day of the week.
    pub fn day_mut(&mut self, day: Weekday) -> &mut TimeSet {
        &mut self.days[day.num_days_from_monday() as usize]
    }

    /// Availability by Monday-based index, 0..7. Used by the loader and
    /// writer, which walk the file's seven day blocks positionally.
    pub fn day_index_mut(&mut self, index: usize) -> &mut TimeSet {
        &mut self.days[index]
    }

    /// Iterate the seven days in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = &TimeSet> {
        self.days.iter()
    }
}

/// A tournament participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Current score; non-negative, advances in half points
    pub score: f32,

    /// Ids of every opponent already faced. Symmetric across the roster:
    /// if A lists B, B lists A.
    pub prior_opponents: HashSet<PlayerId>,

    /// Per-weekday availability
    pub availability: WeekSchedule,

    /// Set once per run when a match is committed
    pub paired: bool,

    /// Trailing free text from the roster line, preserved on rewrite
    pub comment: String,
}

impl Player {
    /// Create a new player with empty history and availability.
    pub fn new(id: PlayerId, name: impl Into<String>, score: f32) -> Self {
        Self {
            id,
            name: name.into(),
            score,
            prior_opponents: HashSet::new(),
            availability: WeekSchedule::new(),
            paired: false,
            comment: String::new(),
        }
    }

    /// Whether this player has already faced the given opponent.
    pub fn has_faced(&self, opponent: PlayerId) -> bool {
        self.prior_opponents.contains(&opponent)
    }
}
