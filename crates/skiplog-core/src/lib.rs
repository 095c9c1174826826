//! Core types for the skip tracker log engine
//! this crate turns raw application log lines into the "current session" view:
//! parse, sort newest first, cut the latest session, dedup, then filter.
pub mod dedup;
pub mod engine;
pub mod filter;
pub mod format;
pub mod parser;
pub mod session;

pub use engine::{get_filtered_logs, LogEngine, LogQuery, LogView};
pub use filter::{LevelCounts, LogFilter};
pub use parser::LogParser;
pub use session::{SessionWindower, DEFAULT_SESSION_GAP};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// LOG LEVEL //

/// Log severity levels (ordered from lowest to highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// Match a bracketed level token exactly as the tracker writes it.
    /// Case-sensitive: `[info]` is not a level.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)")]
pub struct UnknownLevel(pub String);

/// Lenient parsing for user input (config files, command line flags):
/// case-insensitive, accepts the usual short aliases.
impl FromStr for LogLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" | "err" => Ok(Self::Error),
            "critical" | "crit" | "fatal" => Ok(Self::Critical),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warning,
            tracing::Level::INFO => Self::Info,
            // the tracker vocabulary has nothing below DEBUG
            _ => Self::Debug,
        }
    }
}

// PARSED LOG ENTRY //

/// One raw line after parsing. Lines that don't look like
/// `[<time>] [<LEVEL>] <message>` are kept with every derived field empty
/// and the whole line as the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLogEntry {
    pub original: String, // the raw line, used for display

    pub timestamp_text: String, // text between the first brackets, empty if unmatched

    #[serde(default)]
    pub parsed_time: Option<NaiveDateTime>, // clock time applied to the parser's reference date

    pub level_token: String, // all-caps token from the second brackets, empty if unmatched

    pub message: String,
}

impl ParsedLogEntry {
    /// entry for a line the grammar rejected
    pub fn unmatched(raw: &str) -> Self {
        Self {
            original: raw.to_string(),
            message: raw.to_string(),
            ..Self::default()
        }
    }

    /// Known severity of the line. `None` for unmatched lines and for
    /// unknown tokens such as `[TRACE]`.
    pub fn level(&self) -> Option<LogLevel> {
        LogLevel::from_token(&self.level_token)
    }

    /// Identity of the entry irrespective of when it was logged.
    pub fn dedup_key(&self) -> String {
        format!("{}-{}", self.level_token, self.message)
    }

    pub fn is_structured(&self) -> bool {
        !self.level_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
    }

    #[test]
    fn test_token_is_case_sensitive() {
        assert_eq!(LogLevel::from_token("WARNING"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::from_token("Warning"), None);
        assert_eq!(LogLevel::from_token("WARN"), None);
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("Critical".parse::<LogLevel>(), Ok(LogLevel::Critical));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(LogLevel::from(tracing::Level::TRACE), LogLevel::Debug);
        assert_eq!(LogLevel::from(tracing::Level::WARN), LogLevel::Warning);
    }

    #[test]
    fn test_dedup_key_for_unmatched_line() {
        let entry = ParsedLogEntry::unmatched("plain text");
        assert_eq!(entry.dedup_key(), "-plain text");
        assert_eq!(entry.level(), None);
        assert!(!entry.is_structured());
    }
}
