//! line parser - turns raw tracker lines into structured entries
//!
//! Clock times carry no date. Every parsed time is placed on the parser's
//! reference date (today by default); that is only sound because the engine
//! never shows more than the most recent session.

mod clock;
mod grammar;

pub use grammar::level_token;

use crate::ParsedLogEntry;
use chrono::{Local, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogParser {
    date: NaiveDate,
}

impl LogParser {
    /// Parser anchored on today's local date.
    pub fn new() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Parse one line. Never fails: a line the grammar rejects comes back
    /// with only `original` and `message` filled in.
    pub fn parse(&self, raw: &str) -> ParsedLogEntry {
        let Some(found) = grammar::match_line(raw) else {
            return ParsedLogEntry::unmatched(raw);
        };

        ParsedLogEntry {
            original: raw.to_string(),
            timestamp_text: found.timestamp.to_string(),
            parsed_time: self.parse_time(found.timestamp),
            level_token: found.level.to_string(),
            message: found.message.to_string(),
        }
    }

    pub fn parse_all<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ParsedLogEntry> {
        lines.iter().map(|line| self.parse(line.as_ref())).collect()
    }

    /// Clock time (`h:mm:ss AM.mmm`) found anywhere in `timestamp_text`,
    /// on the reference date.
    pub fn parse_time(&self, timestamp_text: &str) -> Option<NaiveDateTime> {
        grammar::match_clock(timestamp_text).and_then(|c| clock::on_date(&c, self.date))
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}
