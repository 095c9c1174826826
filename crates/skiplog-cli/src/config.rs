//! Configuration for the skiplog viewer, read from a TOML file and
//! overridden by command line flags.

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use skiplog_core::{LogFilter, LogLevel};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "skiplog.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkiplogConfig {
    // the tracker's active log file
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    // how many trailing lines of the active log to read, 0 reads all of it
    #[serde(default = "default_log_line_count")]
    pub log_line_count: usize,

    #[serde(default = "default_minimum_level")]
    pub minimum_level: LogLevel,

    #[serde(default)]
    pub search_term: String,

    // entries further apart than this start a new session
    #[serde(default = "default_session_gap_minutes")]
    pub session_gap_minutes: u64,

    // poll period of `watch`
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    // filter for skiplog's own diagnostics, RUST_LOG wins when set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // also append skiplog's own diagnostics here, in tracker format
    #[serde(default)]
    pub diagnostics_file: Option<PathBuf>,
}

/// Values given on the command line. `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_file: Option<PathBuf>,
    pub log_line_count: Option<usize>,
    pub minimum_level: Option<LogLevel>,
    pub search_term: Option<String>,
    pub session_gap_minutes: Option<u64>,
    pub diagnostics_file: Option<PathBuf>,
}

impl SkiplogConfig {
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(path) = overrides.log_file {
            self.log_file = path;
        }
        if let Some(count) = overrides.log_line_count {
            self.log_line_count = count;
        }
        if let Some(level) = overrides.minimum_level {
            self.minimum_level = level;
        }
        if let Some(term) = overrides.search_term {
            self.search_term = term;
        }
        if let Some(minutes) = overrides.session_gap_minutes {
            self.session_gap_minutes = minutes;
        }
        if overrides.diagnostics_file.is_some() {
            self.diagnostics_file = overrides.diagnostics_file;
        }
        self
    }

    pub fn filter(&self) -> LogFilter {
        LogFilter::new(self.minimum_level, self.search_term.clone())
    }

    pub fn session_gap(&self) -> Duration {
        Duration::from_secs(self.session_gap_minutes.saturating_mul(60))
    }

    pub fn refresh_interval(&self) -> Duration {
        // tokio's interval panics on a zero period
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }
}

impl Default for SkiplogConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            log_line_count: default_log_line_count(),
            minimum_level: default_minimum_level(),
            search_term: String::new(),
            session_gap_minutes: default_session_gap_minutes(),
            refresh_interval_ms: default_refresh_interval_ms(),
            log_level: default_log_level(),
            diagnostics_file: None,
        }
    }
}

// default value helpers for serde
fn default_log_file() -> PathBuf {
    PathBuf::from("logs/spotify_app.log")
}

fn default_log_line_count() -> usize {
    500
}

fn default_minimum_level() -> LogLevel {
    LogLevel::Info
}

fn default_session_gap_minutes() -> u64 {
    30
}

fn default_refresh_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SkiplogConfig, CliError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    toml::from_str(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config at `path`. Only the default location may be absent, which
/// gives `None`; a missing file named on the command line is an error.
pub fn load_or_default(path: &Path) -> Result<Option<SkiplogConfig>, CliError> {
    match load_config(path) {
        Ok(config) => Ok(Some(config)),
        Err(CliError::Io { source, .. })
            if source.kind() == ErrorKind::NotFound && path == Path::new(DEFAULT_CONFIG_PATH) =>
        {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
