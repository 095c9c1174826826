// Writer side of the tracker line format: `[h:mm:ss AM.mmm] [LEVEL] message`

use crate::LogLevel;
use chrono::Timelike;

/// `10:15:30 AM.123`. Hour is not zero padded, milliseconds always three digits.
pub fn format_clock<T: Timelike>(time: &T) -> String {
    let (pm, hour) = time.hour12();
    let marker = if pm { "PM" } else { "AM" };
    // leap seconds show up as nanosecond >= 1e9
    let millis = (time.nanosecond() / 1_000_000) % 1000;
    format!(
        "{hour}:{minute:02}:{second:02} {marker}.{millis:03}",
        minute = time.minute(),
        second = time.second(),
    )
}

pub fn format_line<T: Timelike>(time: &T, level: LogLevel, message: &str) -> String {
    format!("[{}] [{}] {}", format_clock(time), level, message)
}
