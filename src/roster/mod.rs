//! Roster construction, validation, and rank ordering.
//!
//! The roster owns every `Player` record for the duration of a run. The
//! engine mutates records through `record_pairing`, which keeps the
//! prior-opponent sets symmetric.

use std::collections::HashSet;

use chrono::Weekday;
use thiserror::Error;

use crate::models::{Player, PlayerId};

/// Roster validation errors.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("player {id} ({name}) has invalid score {score}: scores advance in half points")]
    InvalidScore {
        id: PlayerId,
        name: String,
        score: f32,
    },

    #[error("duplicate player id {id}")]
    DuplicateId { id: PlayerId },
}

/// Whether a score is a non-negative multiple of 0.5.
fn is_half_point(score: f32) -> bool {
    score >= 0.0 && (score * 2.0).fract() == 0.0
}

/// An ordered, validated collection of players.
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    longest_name: usize,
}

impl Roster {
    /// Validate player records and build a roster.
    ///
    /// Fails on a score that is not a multiple of 0.5 or on colliding ids.
    pub fn build(players: Vec<Player>) -> Result<Self, RosterError> {
        let mut seen = HashSet::new();
        for player in &players {
            if !is_half_point(player.score) {
                return Err(RosterError::InvalidScore {
                    id: player.id,
                    name: player.name.clone(),
                    score: player.score,
                });
            }
            if !seen.insert(player.id) {
                return Err(RosterError::DuplicateId { id: player.id });
            }
        }

        let longest_name = players.iter().map(|p| p.name.len()).max().unwrap_or(0);
        Ok(Self {
            players,
            longest_name,
        })
    }

    /// All players, in input order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True when the roster holds no players.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Length of the longest player name, for report alignment.
    pub fn longest_name(&self) -> usize {
        self.longest_name
    }

    /// Indices of all players in rank order for the given day: score
    /// descending, then earliest-available minute ascending, then
    /// latest-available minute ascending. The sort is stable, so players
    /// with identical keys keep their input order.
    ///
    /// Computed once before pairing; mutation during the run does not
    /// reorder.
    pub fn ranked_order(&self, day: Weekday) -> Vec<usize> {
        let keys: Vec<(u16, u16)> = self
            .players
            .iter()
            .map(|p| {
                let times = p.availability.day(day);
                (
                    times.earliest().unwrap_or(u16::MAX),
                    times.latest().unwrap_or(u16::MAX),
                )
            })
            .collect();

        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.sort_by(|&a, &b| {
            self.players[b]
                .score
                .partial_cmp(&self.players[a].score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| keys[a].cmp(&keys[b]))
        });
        order
    }

    /// Record a committed pairing: mark both players paired and add each id
    /// to the other's prior opponents. The symmetry invariant holds as soon
    /// as this returns.
    pub fn record_pairing(&mut self, a: usize, b: usize) {
        debug_assert!(a != b);
        let id_a = self.players[a].id;
        let id_b = self.players[b].id;

        self.players[a].paired = true;
        self.players[a].prior_opponents.insert(id_b);
        self.players[b].paired = true;
        self.players[b].prior_opponents.insert(id_a);
    }
}
