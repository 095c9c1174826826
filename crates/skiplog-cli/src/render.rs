// Terminal output for log views

use crate::source::ArchiveInfo;
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use skiplog_core::parser::level_token;
use skiplog_core::{LevelCounts, LogLevel, LogParser, LogView};

pub fn print_view(view: &LogView, source_label: &str) {
    println!("\n{} {}", "📋 Current Session".cyan().bold(), source_label.dimmed());
    println!("{}", "─".repeat(80).dimmed());

    if view.lines.is_empty() {
        println!("{}", "No log entries match.".yellow());
    } else {
        println!("{}", view_table(view));
    }

    println!();
    print_counts(&view.counts);
    println!(
        "{} {} of {} in session, {} read",
        "Shown:".dimmed(),
        view.lines.len().to_string().green(),
        view.session_len,
        view.total_lines
    );
}

fn view_table(view: &LogView) -> Table {
    // display lines are already filtered, parsing again only splits the columns
    let parser = LogParser::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Level", "Message"]);

    for line in &view.lines {
        let entry = parser.parse(line);
        let row = if entry.is_structured() {
            let level = match entry.level() {
                Some(level) => level_colored(level).to_string(),
                None => entry.level_token.clone(),
            };
            vec![entry.timestamp_text, level, entry.message]
        } else {
            // `[t] [LEVEL]` with nothing after it has a level but no full header
            let level = level_token(line)
                .and_then(LogLevel::from_token)
                .map(|level| level_colored(level).to_string())
                .unwrap_or_default();
            vec![String::new(), level, line.clone()]
        };
        table.add_row(row);
    }
    table
}

pub fn print_counts(counts: &LevelCounts) {
    let parts: Vec<String> = LogLevel::ALL
        .iter()
        .map(|&level| format!("{} {}", level_colored(level), counts.get(level)))
        .collect();
    println!("{}", parts.join("  "));
}

pub fn print_archives(archives: &[ArchiveInfo]) {
    println!("\n{}", "🗂  Archived Logs".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    if archives.is_empty() {
        println!("{}", "No archived logs found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["File", "Size", "Modified"]);

    for archive in archives {
        let modified = archive
            .modified
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            archive.path.display().to_string(),
            format_size(archive.size_bytes),
            modified,
        ]);
    }

    println!("{table}");
}

/// Clear the terminal before a `watch` redraw.
pub fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

fn level_colored(level: LogLevel) -> ColoredString {
    let name = level.as_str();
    match level {
        LogLevel::Critical => name.red().bold(),
        LogLevel::Error => name.red(),
        LogLevel::Warning => name.yellow(),
        LogLevel::Info => name.green(),
        LogLevel::Debug => name.blue(),
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
