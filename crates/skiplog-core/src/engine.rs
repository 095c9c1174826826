//! Log ingestion engine - composes parse, sort, session window, dedup and filter.
//!
//! Every call starts from scratch; nothing is cached between runs, so the
//! same query always produces the same view (for a fixed reference date).

use crate::dedup::dedup_originals;
use crate::filter::{LevelCounts, LogFilter};
use crate::parser::LogParser;
use crate::session::{sort_newest_first, SessionWindower};
use crate::LogLevel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Everything a display needs to ask for: the lines it has and how it wants
/// them filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    pub lines: Vec<String>,
    pub minimum_level: LogLevel,

    #[serde(default)]
    pub search_term: String,
}

impl LogQuery {
    pub fn new(lines: Vec<String>, minimum_level: LogLevel, search_term: impl Into<String>) -> Self {
        Self {
            lines,
            minimum_level,
            search_term: search_term.into(),
        }
    }

    pub fn filter(&self) -> LogFilter {
        LogFilter::new(self.minimum_level, self.search_term.clone())
    }
}

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogView {
    pub lines: Vec<String>, // newest first, ready for display
    pub counts: LevelCounts, // tally of `lines`
    pub session_len: usize, // entries in the session before dedup and filtering
    pub total_lines: usize, // lines handed in
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogEngine {
    parser: LogParser,
    windower: SessionWindower,
}

impl LogEngine {
    /// Engine for today's logs with the default 30 minute session gap.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.parser = LogParser::for_date(date);
        self
    }

    pub fn with_session_gap(mut self, gap: Duration) -> Self {
        self.windower = SessionWindower::new(gap);
        self
    }

    pub fn run(&self, query: &LogQuery) -> LogView {
        let (lines, session_len) = self.select(&query.lines, &query.filter());
        let counts = LevelCounts::tally(lines.iter().map(String::as_str));

        debug!(
            total = query.lines.len(),
            session = session_len,
            shown = lines.len(),
            min_level = %query.minimum_level,
            "Log view computed"
        );

        LogView {
            lines,
            counts,
            session_len,
            total_lines: query.lines.len(),
        }
    }

    /// Just the display lines for `filter`.
    pub fn filtered_lines<S: AsRef<str>>(&self, lines: &[S], filter: &LogFilter) -> Vec<String> {
        self.select(lines, filter).0
    }

    fn select<S: AsRef<str>>(&self, lines: &[S], filter: &LogFilter) -> (Vec<String>, usize) {
        let mut entries = self.parser.parse_all(lines);
        sort_newest_first(&mut entries);

        let session = self.windower.window(&entries);
        let unique = dedup_originals(session);
        let shown = filter.apply(unique).into_iter().map(str::to_string).collect();

        (shown, session.len())
    }
}

/// One-shot entry point: today's date, 30 minute sessions.
pub fn get_filtered_logs<S: AsRef<str>>(
    lines: &[S],
    minimum_level: LogLevel,
    search_term: &str,
) -> Vec<String> {
    LogEngine::new().filtered_lines(lines, &LogFilter::new(minimum_level, search_term))
}
