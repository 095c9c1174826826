//! Level and search filtering, plus the per-level tally shown next to the view.
//!
//! Both work on the display lines themselves and re-read the level token
//! from the text. A line with no level token, or a token outside the five
//! known levels, can never satisfy a minimum level and is always filtered out.

use crate::parser::level_token;
use crate::LogLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    pub minimum_level: LogLevel,

    #[serde(default)]
    pub search_term: String, // case-insensitive substring, empty matches everything
}

impl LogFilter {
    pub fn new(minimum_level: LogLevel, search_term: impl Into<String>) -> Self {
        Self {
            minimum_level,
            search_term: search_term.into(),
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        self.matches_lowered(line, &self.search_term.to_lowercase())
    }

    /// Keep the lines that pass, in their original order.
    pub fn apply<'a, I>(&self, lines: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let needle = self.search_term.to_lowercase();
        lines
            .into_iter()
            .filter(|line| self.matches_lowered(line, &needle))
            .collect()
    }

    fn matches_lowered(&self, line: &str, needle: &str) -> bool {
        let Some(level) = level_token(line).and_then(LogLevel::from_token) else {
            return false;
        };
        level >= self.minimum_level && (needle.is_empty() || line.to_lowercase().contains(needle))
    }
}

impl Default for LogFilter {
    /// everything with a known level
    fn default() -> Self {
        Self::new(LogLevel::Debug, "")
    }
}

// LEVEL COUNTS //

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct LevelCounts {
    pub debug: usize,
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

impl LevelCounts {
    pub fn tally<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = Self::default();
        for level in lines
            .into_iter()
            .filter_map(|line| level_token(line).and_then(LogLevel::from_token))
        {
            counts.record(level);
        }
        counts
    }

    pub fn record(&mut self, level: LogLevel) {
        *self.slot(level) += 1;
    }

    pub fn get(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
            LogLevel::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        LogLevel::ALL.iter().map(|&level| self.get(level)).sum()
    }

    fn slot(&mut self, level: LogLevel) -> &mut usize {
        match level {
            LogLevel::Debug => &mut self.debug,
            LogLevel::Info => &mut self.info,
            LogLevel::Warning => &mut self.warning,
            LogLevel::Error => &mut self.error,
            LogLevel::Critical => &mut self.critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: [&str; 5] = [
        "[10:19:30 AM.345] [CRITICAL] Connection lost",
        "[10:18:05 AM.012] [ERROR] Failed to fetch user profile",
        "[10:17:20 AM.789] [WARNING] Rate limit approaching",
        "[10:16:45 AM.456] [DEBUG] Connecting to Spotify API",
        "[10:15:30 AM.123] [INFO] Application started",
    ];

    #[test]
    fn test_minimum_level_warning() {
        let kept = LogFilter::new(LogLevel::Warning, "").apply(LINES);
        assert_eq!(kept, &LINES[..3]);
    }

    #[test]
    fn test_line_without_level_is_excluded() {
        let filter = LogFilter::default();
        assert!(!filter.matches("Traceback (most recent call last):"));
        assert!(!filter.matches("[t] [TRACE] below debug"));
    }

    #[test]
    fn test_level_without_message_still_counts() {
        // not a full line for the parser, but the level is readable
        assert!(LogFilter::default().matches("[t] [INFO]"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let line = "[t] [WARNING] Rate limit approaching";
        for term in ["rate", "RATE", "ate lim"] {
            assert!(LogFilter::new(LogLevel::Debug, term).matches(line), "{term}");
        }
        assert!(!LogFilter::new(LogLevel::Debug, "quota").matches(line));
    }

    #[test]
    fn test_search_covers_whole_line() {
        // the stamp and level are part of what is searched
        assert!(LogFilter::new(LogLevel::Debug, "10:17").matches(LINES[2]));
        assert!(LogFilter::new(LogLevel::Debug, "[warning]").matches(LINES[2]));
    }

    #[test]
    fn test_counts() {
        let counts = LevelCounts::tally(LINES);
        assert_eq!(counts.debug, 1);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_counts_skip_unknown_levels() {
        let counts = LevelCounts::tally(["plain text", "[t] [NOTICE] hi", "[t] [ERROR] x"]);
        assert_eq!(counts, LevelCounts { error: 1, ..LevelCounts::default() });
    }
}
