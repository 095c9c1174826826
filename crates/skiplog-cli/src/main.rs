// skiplog - current-session log viewer for the Spotify Skip Tracker

mod config;
mod error;
mod logging;
mod render;
mod source;

use clap::{Parser, Subcommand};
use config::{load_or_default, Overrides, SkiplogConfig, DEFAULT_CONFIG_PATH};
use error::CliError;
use skiplog_core::{LogEngine, LogFilter, LogLevel, LogQuery, LogView};
use source::LogSource;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "skiplog")]
#[command(version = "0.1.0")]
#[command(about = "Current-session log viewer for the Spotify Skip Tracker", long_about = None)]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long, env = "SKIPLOG_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Active log file
    #[arg(long, env = "SKIPLOG_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Minimum level to show (debug, info, warning, error, critical)
    #[arg(short = 'L', long)]
    level: Option<LogLevel>,

    /// Case-insensitive text to look for
    #[arg(short, long)]
    search: Option<String>,

    /// Trailing lines of the active log to read (0 = all)
    #[arg(short = 'n', long)]
    lines: Option<usize>,

    /// Minutes of silence that start a new session
    #[arg(long)]
    gap_minutes: Option<u64>,

    /// Also append skiplog's own diagnostics to this file
    #[arg(long)]
    diagnostics_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current session once
    Show {
        /// Read this archived log instead of the active one
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep the current session on screen, refreshing as the log grows
    Watch,

    /// Count entries per level in the current session
    Counts {
        /// Read this archived log instead of the active one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List archived log files next to the active log
    Archives,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_or_default(&cli.config)?;
    let config_found = loaded.is_some();
    let config = loaded.unwrap_or_default().apply(Overrides {
        log_file: cli.log_file,
        log_line_count: cli.lines,
        minimum_level: cli.level,
        search_term: cli.search,
        session_gap_minutes: cli.gap_minutes,
        diagnostics_file: cli.diagnostics_file,
    });

    logging::init(&config.log_level, config.diagnostics_file.as_deref())?;
    if config_found {
        debug!(path = %cli.config.display(), "Config loaded");
    } else {
        debug!(path = %cli.config.display(), "No config file, using defaults");
    }

    let source = LogSource::new(&config.log_file, config.log_line_count);
    let filter = config.filter();

    match cli.command {
        Commands::Show { file, json } => {
            let (lines, label) = read_lines(&source, file.as_deref())?;
            let view = run_engine(&config, lines, &filter);
            if json {
                println!("{}", serde_json::to_string_pretty(&view).map_err(CliError::from)?);
            } else {
                render::print_view(&view, &label);
            }
        }
        Commands::Watch => {
            watch(&config, &source, &filter).await?;
        }
        Commands::Counts { file } => {
            let (lines, _) = read_lines(&source, file.as_deref())?;
            let view = run_engine(&config, lines, &filter);
            render::print_counts(&view.counts);
        }
        Commands::Archives => {
            let archives = source.archives()?;
            info!(count = archives.len(), "Archives listed");
            render::print_archives(&archives);
        }
    }

    Ok(())
}

/// Active log tail, or the whole of an archived file.
fn read_lines(source: &LogSource, archive: Option<&Path>) -> Result<(Vec<String>, String), CliError> {
    match archive {
        Some(path) => Ok((source.archived_lines(path)?, path.display().to_string())),
        None => Ok((
            source.active_lines()?,
            source.active_path().display().to_string(),
        )),
    }
}

// a fresh engine per run keeps "today" current across midnight
fn run_engine(config: &SkiplogConfig, lines: Vec<String>, filter: &LogFilter) -> LogView {
    let engine = LogEngine::new().with_session_gap(config.session_gap());
    engine.run(&LogQuery::new(
        lines,
        filter.minimum_level,
        filter.search_term.clone(),
    ))
}

async fn watch(config: &SkiplogConfig, source: &LogSource, filter: &LogFilter) -> Result<(), CliError> {
    let period: Duration = config.refresh_interval();
    let mut ticker = tokio::time::interval(period);
    let mut shown: Option<Vec<String>> = None;
    let label = source.active_path().display().to_string();

    info!(
        path = %label,
        interval_ms = period.as_millis() as u64,
        min_level = %filter.minimum_level,
        "Watching log"
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let view = run_engine(config, source.active_lines()?, filter);
                // redraw only when what is on screen would change
                if shown.as_ref() != Some(&view.lines) {
                    render::clear_screen();
                    render::print_view(&view, &label);
                    io::stdout().flush().map_err(|e| CliError::io("<stdout>", e))?;
                    shown = Some(view.lines);
                }
            }
            _ = &mut ctrl_c => {
                info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}
