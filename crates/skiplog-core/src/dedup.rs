// Deduplication of repeated messages within a session

use crate::ParsedLogEntry;
use std::collections::HashSet;

/// Original lines with repeats of the same level + message dropped.
/// First occurrence wins, which on a newest-first list is the most recent one.
pub fn dedup_originals(entries: &[ParsedLogEntry]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .filter(|entry| seen.insert(entry.dedup_key()))
        .map(|entry| entry.original.as_str())
        .collect()
}
