//! Session windowing - the log file spans many application runs, the view
//! only shows the latest one. A run ends wherever two consecutive timed
//! entries are more than the gap apart.

use crate::ParsedLogEntry;
use chrono::{NaiveDateTime, TimeDelta};
use std::time::Duration;
use tracing::debug;

/// Gap that separates two application runs.
pub const DEFAULT_SESSION_GAP: Duration = Duration::from_secs(30 * 60);

/// Sort newest first. Only entries with a parsed time move: they are
/// stable-sorted among themselves and put back into the slots timed entries
/// occupied, so untimed lines stay exactly where they were.
pub fn sort_newest_first(entries: &mut [ParsedLogEntry]) {
    let slots: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.parsed_time.is_some())
        .map(|(i, _)| i)
        .collect();

    let mut timed: Vec<ParsedLogEntry> = slots
        .iter()
        .map(|&i| std::mem::take(&mut entries[i]))
        .collect();
    timed.sort_by(|a, b| b.parsed_time.cmp(&a.parsed_time));

    for (slot, entry) in slots.into_iter().zip(timed) {
        entries[slot] = entry;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindower {
    max_gap: TimeDelta,
}

impl SessionWindower {
    pub fn new(max_gap: Duration) -> Self {
        Self {
            max_gap: TimeDelta::from_std(max_gap).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Most recent session of a newest-first list, as a prefix of it.
    ///
    /// Stops before the first timed entry that is more than the gap older
    /// than the previous timed entry, or newer than it. Untimed entries are
    /// always taken and leave the reference time alone. Older sessions are
    /// never looked at.
    pub fn window<'a>(&self, sorted: &'a [ParsedLogEntry]) -> &'a [ParsedLogEntry] {
        let mut previous: Option<NaiveDateTime> = None;

        for (index, entry) in sorted.iter().enumerate() {
            let Some(time) = entry.parsed_time else {
                continue;
            };
            if let Some(prev) = previous {
                let gap = prev - time;
                if gap < TimeDelta::zero() || gap > self.max_gap {
                    debug!(
                        session_len = index,
                        gap_ms = gap.num_milliseconds(),
                        "Session boundary"
                    );
                    return &sorted[..index];
                }
            }
            previous = Some(time);
        }

        sorted
    }
}

impl Default for SessionWindower {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_GAP)
    }
}
