//! Pairing model — a committed match between two players.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A single committed pairing with its scheduled start time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pairing {
    /// Higher-ranked player's id
    pub player_a: PlayerId,

    /// Lower-ranked player's id
    pub player_b: PlayerId,

    /// Player A's display name
    pub name_a: String,

    /// Player B's display name
    pub name_b: String,

    /// Scheduled start as a minute-of-day value
    pub start: u16,

    /// True when the start was pushed past the slot's opening by the
    /// minimum-gap rule; such a match could move earlier if the blocking
    /// match frees its time. Informational only.
    pub movable: bool,
}

impl Pairing {
    /// Create a new pairing.
    pub fn new(
        player_a: PlayerId,
        player_b: PlayerId,
        name_a: impl Into<String>,
        name_b: impl Into<String>,
        start: u16,
        movable: bool,
    ) -> Self {
        Self {
            player_a,
            player_b,
            name_a: name_a.into(),
            name_b: name_b.into(),
            start,
            movable,
        }
    }

    /// Start time rendered as zero-padded `HH:MM`.
    pub fn start_hhmm(&self) -> String {
        format!("{:02}:{:02}", self.start / 60, self.start % 60)
    }
}
