//! Greedy pairing engine.
//!
//! Players are visited in rank order; for each unpaired player the engine
//! scans strictly later-ranked candidates and commits the first mutually
//! available slot that passes the eligibility and minimum-gap rules. The
//! result is deterministic for identical input and makes no attempt at a
//! globally optimal matching: once a pair commits, there is no backtracking.

use tracing::{debug, info};

use crate::config::RunConfig;
use crate::models::{Island, Pairing};
use crate::report::{ReportModel, UnpairedPlayer};
use crate::roster::Roster;

/// Run one pairing pass over the roster.
pub fn run(roster: &mut Roster, config: &RunConfig) -> ReportModel {
    let order = roster.ranked_order(config.day);
    let mut pairings: Vec<Pairing> = Vec::new();

    for (pos, &p1) in order.iter().enumerate() {
        if roster.players()[p1].paired {
            continue;
        }
        match_player(roster, config, &order[pos + 1..], p1, &mut pairings);
    }

    let unpaired: Vec<UnpairedPlayer> = order
        .iter()
        .map(|&idx| &roster.players()[idx])
        .filter(|p| !p.paired)
        .map(|p| UnpairedPlayer {
            id: p.id,
            name: p.name.clone(),
        })
        .collect();

    info!(
        pairings = pairings.len(),
        unpaired = unpaired.len(),
        "pairing pass complete"
    );

    ReportModel::new(pairings, unpaired, roster.longest_name())
}

/// Scan later-ranked candidates for `p1` and commit the first acceptable
/// slot. Returns true when a pairing was committed.
fn match_player(
    roster: &mut Roster,
    config: &RunConfig,
    candidates: &[usize],
    p1: usize,
    pairings: &mut Vec<Pairing>,
) -> bool {
    for &p2 in candidates {
        let a = &roster.players()[p1];
        let b = &roster.players()[p2];

        if a.paired || b.paired {
            continue;
        }
        // Rank order guarantees a.score >= b.score, so one side suffices.
        if a.score - b.score > config.max_point_difference {
            debug!(p1 = a.id, p2 = b.id, "skipping candidate: score gap too large");
            continue;
        }
        if a.has_faced(b.id) {
            debug!(p1 = a.id, p2 = b.id, "skipping candidate: already faced");
            continue;
        }

        let free = a
            .availability
            .day(config.day)
            .intersect(b.availability.day(config.day));
        let (id_a, id_b) = (a.id, b.id);
        let (name_a, name_b) = (a.name.clone(), b.name.clone());

        let mut cursor = config.earliest_minute();
        while let Some(island) = free.next_island(cursor) {
            if let Some((start, movable)) =
                accept_slot(&island, pairings.last(), config.min_time_gap)
            {
                let pairing = Pairing::new(id_a, id_b, name_a.clone(), name_b.clone(), start, movable);
                info!(
                    p1 = pairing.player_a,
                    p2 = pairing.player_b,
                    start = %pairing.start_hhmm(),
                    movable,
                    "committed pairing"
                );
                roster.record_pairing(p1, p2);
                pairings.push(pairing);
                return true;
            }
            cursor = island.end();
        }
    }

    false
}

/// Decide whether an island can host a match, returning the start minute and
/// whether the start was shifted.
///
/// If the previously committed pairing starts at exactly this island's start,
/// the start is buffered forward by the minimum gap. Only the immediately
/// previous pairing is inspected, as in the reference behavior; three or more
/// matches clustering on one slot can under-enforce the gap.
fn accept_slot(island: &Island, previous: Option<&Pairing>, gap: u16) -> Option<(u16, bool)> {
    if island.width() == 0 {
        return None;
    }

    let mut start = island.start();
    let mut movable = false;
    if previous.is_some_and(|p| p.start == start) {
        start += gap;
        movable = true;
    }

    // The interval must host a match of at least the minimum gap's duration.
    if start + gap <= island.end() {
        Some((start, movable))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    use crate::models::Player;

    const DAY: Weekday = Weekday::Sat;

    fn config(max_point_difference: f32, min_time_gap: u16) -> RunConfig {
        RunConfig {
            day: DAY,
            max_point_difference,
            min_time_gap,
            earliest_time: 0.0,
        }
    }

    fn player(id: u32, name: &str, score: f32, ranges: &[(u8, u8, u8, u8)]) -> Player {
        let mut p = Player::new(id, name, score);
        for &(h1, m1, h2, m2) in ranges {
            p.availability.day_mut(DAY).set_range(h1, m1, h2, m2);
        }
        p
    }

    #[test]
    fn test_two_players_pair_at_window_start() {
        let mut roster = Roster::build(vec![
            player(0, "A", 5.0, &[(9, 0, 10, 0)]),
            player(1, "B", 5.0, &[(9, 0, 10, 0)]),
        ])
        .unwrap();

        let report = run(&mut roster, &config(1.0, 30));

        assert_eq!(report.pairings().len(), 1);
        assert_eq!(report.pairings()[0].start, 9 * 60);
        assert!(report.unpaired().is_empty());
    }

    #[test]
    fn test_score_gap_excludes_candidate() {
        let mut roster = Roster::build(vec![
            player(0, "A", 10.0, &[(9, 0, 12, 0)]),
            player(1, "B", 9.5, &[(9, 0, 12, 0)]),
            player(2, "C", 5.0, &[(9, 0, 12, 0)]),
        ])
        .unwrap();

        let report = run(&mut roster, &config(1.0, 30));

        assert_eq!(report.pairings().len(), 1);
        assert_eq!(report.pairings()[0].player_a, 0);
        assert_eq!(report.pairings()[0].player_b, 1);
        assert_eq!(report.unpaired().len(), 1);
        assert_eq!(report.unpaired()[0].id, 2);
        assert_eq!(report.unpaired()[0].name, "C");
    }

    #[test]
    fn test_interval_too_narrow_for_gap() {
        let mut roster = Roster::build(vec![
            player(0, "A", 5.0, &[(9, 0, 9, 45)]),
            player(1, "B", 5.0, &[(9, 0, 9, 45)]),
        ])
        .unwrap();

        let report = run(&mut roster, &config(1.0, 60));

        assert!(report.pairings().is_empty());
        assert_eq!(report.unpaired().len(), 2);
    }

    #[test]
    fn test_prior_opponents_never_rematched() {
        let mut a = player(0, "A", 5.0, &[(9, 0, 12, 0)]);
        let mut b = player(1, "B", 5.0, &[(9, 0, 12, 0)]);
        a.prior_opponents.insert(1);
        b.prior_opponents.insert(0);

        let mut roster = Roster::build(vec![a, b]).unwrap();
        let report = run(&mut roster, &config(1.0, 30));

        assert!(report.pairings().is_empty());
        assert_eq!(report.unpaired().len(), 2);
    }

    #[test]
    fn test_symmetry_holds_after_commit() {
        let mut roster = Roster::build(vec![
            player(0, "A", 5.0, &[(9, 0, 12, 0)]),
            player(1, "B", 5.0, &[(9, 0, 12, 0)]),
        ])
        .unwrap();

        run(&mut roster, &config(1.0, 30));

        assert!(roster.players()[0].has_faced(1));
        assert!(roster.players()[1].has_faced(0));
    }

    #[test]
    fn test_equal_start_times_are_buffered_by_gap() {
        // Two pairs share the same opening minute; the second start is
        // pushed by the gap and flagged movable.
        let mut roster = Roster::build(vec![
            player(0, "A", 5.0, &[(9, 0, 12, 0)]),
            player(1, "B", 5.0, &[(9, 0, 12, 0)]),
            player(2, "C", 5.0, &[(9, 0, 12, 0)]),
            player(3, "D", 5.0, &[(9, 0, 12, 0)]),
        ])
        .unwrap();

        let report = run(&mut roster, &config(1.0, 30));

        assert_eq!(report.pairings().len(), 2);
        let first = &report.pairings()[0];
        let second = &report.pairings()[1];
        assert_eq!(first.start, 9 * 60);
        assert!(!first.movable);
        assert_eq!(second.start, 9 * 60 + 30);
        assert!(second.movable);
        assert!(second.start >= first.start + 30);
    }

    #[test]
    fn test_each_player_paired_at_most_once() {
        let mut roster = Roster::build(vec![
            player(0, "A", 5.0, &[(9, 0, 12, 0)]),
            player(1, "B", 5.0, &[(9, 0, 12, 0)]),
            player(2, "C", 5.0, &[(9, 0, 12, 0)]),
        ])
        .unwrap();

        let report = run(&mut roster, &config(1.0, 30));

        assert_eq!(report.pairings().len(), 1);
        let mut seen = std::collections::HashSet::new();
        for p in report.pairings() {
            assert!(seen.insert(p.player_a));
            assert!(seen.insert(p.player_b));
        }
        // The odd player out is reported unpaired exactly once.
        assert_eq!(report.unpaired().len(), 1);
    }

    #[test]
    fn test_disjoint_availability_stays_unpaired() {
        let mut roster = Roster::build(vec![
            player(0, "A", 5.0, &[(9, 0, 10, 0)]),
            player(1, "B", 5.0, &[(14, 0, 15, 0)]),
        ])
        .unwrap();

        let report = run(&mut roster, &config(1.0, 30));

        assert!(report.pairings().is_empty());
        assert_eq!(report.unpaired().len(), 2);
    }

    #[test]
    fn test_later_island_used_when_first_too_narrow() {
        let mut roster = Roster::build(vec![
            player(0, "A", 5.0, &[(9, 0, 9, 20), (15, 0, 16, 0)]),
            player(1, "B", 5.0, &[(9, 0, 9, 20), (15, 0, 16, 0)]),
        ])
        .unwrap();

        let report = run(&mut roster, &config(1.0, 30));

        assert_eq!(report.pairings().len(), 1);
        assert_eq!(report.pairings()[0].start, 15 * 60);
    }

    #[test]
    fn test_earliest_time_clamps_scan_window() {
        let mut roster = Roster::build(vec![
            player(0, "A", 5.0, &[(9, 0, 14, 0)]),
            player(1, "B", 5.0, &[(9, 0, 14, 0)]),
        ])
        .unwrap();

        let config = RunConfig {
            day: DAY,
            max_point_difference: 1.0,
            min_time_gap: 30,
            earliest_time: 12.0,
        };
        let report = run(&mut roster, &config);

        assert_eq!(report.pairings().len(), 1);
        assert_eq!(report.pairings()[0].start, 12 * 60);
    }

    #[test]
    fn test_higher_ranked_pairs_first() {
        // B and C both fit A's score bound; the greedy scan takes the
        // higher-ranked B even though C would leave a better global result.
        let mut roster = Roster::build(vec![
            player(0, "A", 6.0, &[(9, 0, 12, 0)]),
            player(1, "B", 5.5, &[(9, 0, 12, 0)]),
            player(2, "C", 5.0, &[(9, 0, 12, 0)]),
        ])
        .unwrap();

        let report = run(&mut roster, &config(1.0, 30));

        assert_eq!(report.pairings()[0].player_b, 1);
    }

    #[test]
    fn test_accept_slot_rejects_zero_width_island() {
        let island = Island {
            hour: 9,
            start_minute: 10,
            end_minute: 10,
        };
        assert_eq!(accept_slot(&island, None, 0), None);
    }

    #[test]
    fn test_accept_slot_accepts_exact_fit() {
        let island = Island {
            hour: 9,
            start_minute: 0,
            end_minute: 30,
        };
        assert_eq!(accept_slot(&island, None, 30), Some((9 * 60, false)));
    }

    #[test]
    fn test_accept_slot_buffers_against_previous_start() {
        let island = Island {
            hour: 9,
            start_minute: 0,
            end_minute: 60,
        };
        let previous = Pairing::new(0, 1, "A", "B", 9 * 60, false);

        let (start, movable) = accept_slot(&island, Some(&previous), 20).unwrap();
        assert_eq!(start, 9 * 60 + 20);
        assert!(movable);
    }

    #[test]
    fn test_accept_slot_rejects_when_buffer_leaves_no_room() {
        let island = Island {
            hour: 9,
            start_minute: 0,
            end_minute: 45,
        };
        let previous = Pairing::new(0, 1, "A", "B", 9 * 60, false);

        // After the 30-minute buffer only 15 minutes remain.
        assert_eq!(accept_slot(&island, Some(&previous), 30), None);
    }
}
