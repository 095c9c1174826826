//! Log storage side: the active log's recent tail and the archived files
//! that sit next to it (rotated copies and older runs).

use crate::error::CliError;
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ArchiveInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
}

#[derive(Debug, Clone)]
pub struct LogSource {
    active: PathBuf,
    line_count: usize,
}

impl LogSource {
    pub fn new(active: impl Into<PathBuf>, line_count: usize) -> Self {
        Self {
            active: active.into(),
            line_count,
        }
    }

    pub fn active_path(&self) -> &Path {
        &self.active
    }

    /// Last `line_count` lines of the active log (all of them for 0).
    /// A log that doesn't exist yet reads as empty.
    pub fn active_lines(&self) -> Result<Vec<String>, CliError> {
        let mut lines = match read_lines(&self.active) {
            Ok(lines) => lines,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.active.display(), "Active log not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(CliError::io(&self.active, e)),
        };

        if self.line_count > 0 && lines.len() > self.line_count {
            lines.drain(..lines.len() - self.line_count);
        }
        Ok(lines)
    }

    /// Whole contents of an archived log.
    pub fn archived_lines(&self, path: &Path) -> Result<Vec<String>, CliError> {
        read_lines(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CliError::NoArchive(path.to_path_buf()),
            _ => CliError::io(path, e),
        })
    }

    /// Archived logs in the active log's directory, newest first: rotated
    /// copies (`spotify_app.log.1`, ...) and any other `*.log` file.
    pub fn archives(&self) -> Result<Vec<ArchiveInfo>, CliError> {
        let dir = match self.active.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let active_name = self
            .active
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CliError::io(&dir, e)),
        };

        let mut archives = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CliError::io(&dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_archive_name(&name, &active_name) {
                continue;
            }
            let metadata = entry.metadata().map_err(|e| CliError::io(entry.path(), e))?;
            if !metadata.is_file() {
                continue;
            }
            archives.push(ArchiveInfo {
                path: entry.path(),
                size_bytes: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Local>::from),
            });
        }

        archives.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
        Ok(archives)
    }
}

fn is_archive_name(name: &str, active_name: &str) -> bool {
    if name == active_name {
        return false;
    }
    let rotated = name
        .strip_prefix(active_name)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()));
    rotated || name.ends_with(".log")
}

// invalid UTF-8 is replaced rather than rejected, a half-written line must not hide the log
fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_tail_of_active_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "spotify_app.log", "one\ntwo\nthree\nfour\n");

        let lines = LogSource::new(&path, 2).active_lines().unwrap();
        assert_eq!(lines, ["three", "four"]);
    }

    #[test]
    fn test_zero_line_count_reads_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "spotify_app.log", "one\r\ntwo\r\n");

        let lines = LogSource::new(&path, 0).active_lines().unwrap();
        assert_eq!(lines, ["one", "two"]);
    }

    #[test]
    fn test_missing_active_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = LogSource::new(dir.path().join("spotify_app.log"), 500);
        assert!(source.active_lines().unwrap().is_empty());
    }

    #[test]
    fn test_missing_archive_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = LogSource::new(dir.path().join("spotify_app.log"), 500);
        let result = source.archived_lines(&dir.path().join("old.log"));
        assert!(matches!(result, Err(CliError::NoArchive(_))));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spotify_app.log");
        fs::write(&path, b"[t] [INFO] caf\xff\n").unwrap();

        let lines = LogSource::new(&path, 10).active_lines().unwrap();
        assert_eq!(lines, ["[t] [INFO] caf\u{FFFD}"]);
    }

    #[test]
    fn test_archive_listing() {
        let dir = tempfile::tempdir().unwrap();
        let active = write(dir.path(), "spotify_app.log", "active\n");
        write(dir.path(), "spotify_app.log.1", "rotated\n");
        write(dir.path(), "spotify_app.log.10", "rotated\n");
        write(dir.path(), "2024-03-08.log", "older run\n");
        write(dir.path(), "config.json", "{}");
        write(dir.path(), "spotify_app.log.bak", "not a rotation\n");

        let archives = LogSource::new(&active, 500).archives().unwrap();
        let mut names: Vec<String> = archives
            .iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["2024-03-08.log", "spotify_app.log.1", "spotify_app.log.10"]);
        assert!(archives.iter().all(|a| a.size_bytes > 0));
    }

    #[test]
    fn test_archive_name_rules() {
        assert!(is_archive_name("spotify_app.log.3", "spotify_app.log"));
        assert!(!is_archive_name("spotify_app.log.", "spotify_app.log"));
        assert!(!is_archive_name("spotify_app.log", "spotify_app.log"));
        assert!(is_archive_name("session.log", "spotify_app.log"));
    }
}
