//! Minute-resolution availability bitset for a single day.
//!
//! A day is a 24x60 grid: one 64-bit word per hour, bit `m` of hour `h` set
//! when the player is available during minute `m` of that hour. Bits 60..64
//! of every word are always zero.

use serde::{Deserialize, Serialize};

/// Hours in a day.
pub const HOURS_PER_DAY: usize = 24;
/// Minutes in an hour.
pub const MINUTES_PER_HOUR: u16 = 60;
/// Minutes in a day.
pub const MINUTES_PER_DAY: u16 = HOURS_PER_DAY as u16 * MINUTES_PER_HOUR;

/// All 60 minute bits of one hour.
const FULL_HOUR: u64 = (1 << MINUTES_PER_HOUR) - 1;

/// A contiguous bit mask covering minutes `[from, to)` of one hour.
fn run_mask(from: u8, to: u8) -> u64 {
    debug_assert!(from < to && to as u16 <= MINUTES_PER_HOUR);
    (!0u64 >> (64 - (to - from) as u32)) << from
}

/// One day's availability as 24 per-hour bitmasks.
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeSet {
    hours: [u64; HOURS_PER_DAY],
}

/// A maximal contiguous run of available minutes within a single hour.
///
/// Islands never cross hour boundaries: an availability window spanning two
/// hours is reported as two successive islands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
    /// Hour of day, 0..24.
    pub hour: u8,
    /// First available minute within the hour.
    pub start_minute: u8,
    /// One past the last available minute; may be 60.
    pub end_minute: u8,
}

impl Island {
    /// Start as a minute-of-day value.
    pub fn start(&self) -> u16 {
        self.hour as u16 * MINUTES_PER_HOUR + self.start_minute as u16
    }

    /// Exclusive end as a minute-of-day value.
    pub fn end(&self) -> u16 {
        self.hour as u16 * MINUTES_PER_HOUR + self.end_minute as u16
    }

    /// Width in minutes.
    pub fn width(&self) -> u16 {
        self.end() - self.start()
    }

    /// Start as a fractional hour (9:30 is 9.5).
    pub fn start_hours(&self) -> f32 {
        self.hour as f32 + self.start_minute as f32 / 60.0
    }

    /// Exclusive end as a fractional hour.
    pub fn end_hours(&self) -> f32 {
        self.hour as f32 + self.end_minute as f32 / 60.0
    }
}

impl TimeSet {
    /// Create an empty set (no available minutes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every minute in `[start, end)` available.
    ///
    /// Callers (the roster parser) are responsible for hours in 0..24,
    /// minutes in 0..60, and a non-empty interval; violations are a caller
    /// bug, checked only by debug assertions.
    pub fn set_range(&mut self, start_hour: u8, start_minute: u8, end_hour: u8, end_minute: u8) {
        debug_assert!((start_hour as usize) < HOURS_PER_DAY && (end_hour as usize) < HOURS_PER_DAY);
        debug_assert!(start_minute < 60 && end_minute < 60);
        debug_assert!((start_hour, start_minute) < (end_hour, end_minute));

        if start_hour == end_hour {
            self.hours[start_hour as usize] |= run_mask(start_minute, end_minute);
            return;
        }

        self.hours[start_hour as usize] |= run_mask(start_minute, 60);
        for hour in start_hour + 1..end_hour {
            self.hours[hour as usize] = FULL_HOUR;
        }
        if end_minute > 0 {
            self.hours[end_hour as usize] |= run_mask(0, end_minute);
        }
    }

    /// Minutes available in both sets.
    pub fn intersect(&self, other: &TimeSet) -> TimeSet {
        let mut hours = [0u64; HOURS_PER_DAY];
        for (out, (a, b)) in hours
            .iter_mut()
            .zip(self.hours.iter().zip(other.hours.iter()))
        {
            *out = a & b;
        }
        TimeSet { hours }
    }

    /// True when no minute is available.
    pub fn is_empty(&self) -> bool {
        self.hours.iter().all(|&word| word == 0)
    }

    /// Whether a specific minute is available.
    pub fn contains(&self, hour: u8, minute: u8) -> bool {
        debug_assert!((hour as usize) < HOURS_PER_DAY && minute < 60);
        self.hours[hour as usize] & (1 << minute) != 0
    }

    /// The first island starting at or after the given minute-of-day cursor.
    ///
    /// Calling repeatedly with the previous island's `end()` as the new
    /// cursor enumerates every island of the day in ascending order without
    /// repetition.
    pub fn next_island(&self, from_minute: u16) -> Option<Island> {
        if from_minute >= MINUTES_PER_DAY {
            return None;
        }

        let mut hour = (from_minute / MINUTES_PER_HOUR) as usize;
        let offset = from_minute % MINUTES_PER_HOUR;
        let mut word = self.hours[hour] & (!0u64 << offset);

        loop {
            if word != 0 {
                let start = word.trailing_zeros() as u8;
                // Length of the run of 1-bits beginning at `start`. A full
                // hour gives 60 straight away since bits 60..64 are zero.
                let len = (!(word >> start)).trailing_zeros() as u8;
                return Some(Island {
                    hour: hour as u8,
                    start_minute: start,
                    end_minute: start + len,
                });
            }
            hour += 1;
            if hour == HOURS_PER_DAY {
                return None;
            }
            word = self.hours[hour];
        }
    }

    /// Iterator over every island of the day, in ascending time order.
    pub fn islands(&self) -> Islands<'_> {
        Islands {
            set: self,
            cursor: 0,
        }
    }

    /// First available minute-of-day, if any.
    pub fn earliest(&self) -> Option<u16> {
        self.next_island(0).map(|island| island.start())
    }

    /// Exclusive end of the last available run, if any.
    pub fn latest(&self) -> Option<u16> {
        self.islands().last().map(|island| island.end())
    }
}

impl std::fmt::Debug for TimeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges: Vec<String> = self
            .islands()
            .map(|i| {
                format!(
                    "{:02}:{:02}-{:02}:{:02}",
                    i.hour,
                    i.start_minute,
                    i.end() / 60,
                    i.end() % 60
                )
            })
            .collect();
        write!(f, "TimeSet[{}]", ranges.join(", "))
    }
}

/// Iterator over the islands of a [`TimeSet`].
pub struct Islands<'a> {
    set: &'a TimeSet,
    cursor: u16,
}

impl Iterator for Islands<'_> {
    type Item = Island;

    fn next(&mut self) -> Option<Self::Item> {
        let island = self.set.next_island(self.cursor)?;
        self.cursor = island.end();
        Some(island)
    }
}
