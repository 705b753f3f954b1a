//! Updated roster file emission.
//!
//! Writes the roster back out in the same format the loader reads, with the
//! newly recorded prior opponents and the availability re-serialized from
//! the TimeSets, so the next round can be paired straight from the written
//! file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::models::TimeSet;
use crate::roster::Roster;

/// Roster writing errors.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write roster file: {0}")]
    Io(#[from] std::io::Error),
}

/// Adjacent islands merged back into maximal `[start, end)` minute-of-day
/// ranges, undoing the per-hour clipping of island extraction.
fn merged_ranges(times: &TimeSet) -> Vec<(u16, u16)> {
    let mut ranges: Vec<(u16, u16)> = Vec::new();
    for island in times.islands() {
        match ranges.last_mut() {
            Some((_, end)) if *end == island.start() => *end = island.end(),
            _ => ranges.push((island.start(), island.end())),
        }
    }
    ranges
}

fn format_day(times: &TimeSet) -> String {
    let ranges: Vec<String> = merged_ranges(times)
        .iter()
        .map(|&(start, end)| {
            format!(
                "{}:{:02}-{}:{:02}",
                start / 60,
                start % 60,
                end / 60,
                end % 60
            )
        })
        .collect();
    format!("{{{}}}", ranges.join(", "))
}

/// Render the full roster in the loader's file format.
pub fn render_roster_file(roster: &Roster) -> String {
    let width = roster.longest_name();
    let mut out = String::new();

    for player in roster.players() {
        let mut opponents: Vec<u32> = player.prior_opponents.iter().copied().collect();
        opponents.sort_unstable();
        let opponents: Vec<String> = opponents.iter().map(|id| id.to_string()).collect();

        let days: Vec<String> = player.availability.iter().map(format_day).collect();

        out.push_str(&format!(
            "{:<3} {:<width$} {{{}}} {:.1} {{ {} }}",
            player.id,
            player.name,
            opponents.join(", "),
            player.score,
            days.join(", "),
        ));
        if !player.comment.is_empty() {
            out.push_str("   ");
            out.push_str(&player.comment);
        }
        out.push('\n');
    }
    out
}

/// Write the updated roster file.
pub fn write_roster(path: &Path, roster: &Roster) -> Result<(), WriteError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render_roster_file(roster).as_bytes())?;
    writer.flush()?;

    info!("wrote {} players to {:?}", roster.len(), path);
    Ok(())
}
