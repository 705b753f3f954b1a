//! Report model and rendering.
//!
//! The engine hands over committed pairings in commit order plus the players
//! it could not place; the renderer sorts pairings by start time for display
//! and never mutates the model.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::models::{Pairing, PlayerId};
use crate::roster::Roster;

/// A player left without an opponent for this run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpairedPlayer {
    pub id: PlayerId,
    pub name: String,
}

/// Outcome of one pairing pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportModel {
    pairings: Vec<Pairing>,
    unpaired: Vec<UnpairedPlayer>,
    longest_name: usize,
}

impl ReportModel {
    /// Assemble a report from engine output.
    pub fn new(pairings: Vec<Pairing>, unpaired: Vec<UnpairedPlayer>, longest_name: usize) -> Self {
        Self {
            pairings,
            unpaired,
            longest_name,
        }
    }

    /// Committed pairings, in commit order.
    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    /// Players left unpaired, in rank order.
    pub fn unpaired(&self) -> &[UnpairedPlayer] {
        &self.unpaired
    }

    /// Render the human-readable report: the pairing list sorted by start
    /// time, a parallel id listing, and the unpaired line.
    pub fn render_text(&self) -> String {
        let mut by_time: Vec<&Pairing> = self.pairings.iter().collect();
        by_time.sort_by_key(|p| p.start);

        let width = self.longest_name;
        let mut out = String::new();

        for pairing in &by_time {
            out.push_str(&format!(
                "{}: {:<width$} - {:<width$}",
                pairing.start_hhmm(),
                pairing.name_a,
                pairing.name_b,
            ));
            if pairing.movable {
                out.push_str(" [Can change]");
            }
            out.push('\n');
        }
        for pairing in &by_time {
            out.push_str(&format!(
                "id: {:<2} - id: {:<2}\n",
                pairing.player_a, pairing.player_b
            ));
        }

        out.push_str("Unpaired players: ");
        if self.unpaired.is_empty() {
            out.push_str("None");
        } else {
            let entries: Vec<String> = self
                .unpaired
                .iter()
                .map(|p| format!("{} (id: {})", p.name, p.id))
                .collect();
            out.push_str(&entries.join(", "));
        }
        out.push('\n');
        out
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Render the ranked roster: one line per player with name, score, and the
/// day's availability windows.
pub fn render_roster(roster: &Roster, day: Weekday) -> String {
    let width = roster.longest_name();
    let mut out = String::new();

    for &idx in &roster.ranked_order(day) {
        let player = &roster.players()[idx];
        out.push_str(&format!("{:<width$}   {:.1}", player.name, player.score));

        let ranges: Vec<String> = player
            .availability
            .day(day)
            .islands()
            .map(|i| {
                format!(
                    "{:02}:{:02} - {:02}:{:02}",
                    i.hour,
                    i.start_minute,
                    i.end() / 60,
                    i.end() % 60
                )
            })
            .collect();
        if !ranges.is_empty() {
            out.push_str("   ");
            out.push_str(&ranges.join(", "));
        }
        out.push('\n');
    }
    out.push('\n');
    out
}
