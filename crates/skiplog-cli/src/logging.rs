//! skiplog's own diagnostics. Events are written in the tracker's line
//! format so a diagnostics file can be fed straight back into the viewer.

use crate::error::CliError;
use chrono::Local;
use skiplog_core::format::format_clock;
use skiplog_core::LogLevel;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// `[h:mm:ss AM.mmm] [LEVEL] message key=value`
pub struct TrackerFormat;

impl<S, N> FormatEvent<S, N> for TrackerFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = LogLevel::from(*event.metadata().level());
        write!(writer, "[{}] [{}] ", format_clock(&Local::now()), level)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber: stderr always, plus an append-only file
/// when `diagnostics_file` is set. `RUST_LOG` overrides `default_filter`.
pub fn init(default_filter: &str, diagnostics_file: Option<&Path>) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(TrackerFormat)
        .with_writer(std::io::stderr);

    let file_layer = match diagnostics_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::io(path, e))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(TrackerFormat)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}
