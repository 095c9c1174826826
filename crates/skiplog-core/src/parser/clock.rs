// 12-hour clock reconstruction

use super::grammar::ClockMatch;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Convert the 12-hour fields to 24-hour form:
/// PM adds 12 below noon, 12 AM is midnight.
pub(crate) fn to_24_hour(hour: i64, pm: bool) -> i64 {
    if pm && hour < 12 {
        hour + 12
    } else if !pm && hour == 12 {
        0
    } else {
        hour
    }
}

/// Apply the clock to `date`. The fields are added to midnight instead of
/// being validated, so `10:75:00` lands on 11:15 and `25:00:00` on the next
/// day. Digit runs too long to represent give `None`.
pub(crate) fn on_date(clock: &ClockMatch<'_>, date: NaiveDate) -> Option<NaiveDateTime> {
    let hour = to_24_hour(clock.hour.parse().ok()?, clock.pm);
    let minute: i64 = clock.minute.parse().ok()?;
    let second: i64 = clock.second.parse().ok()?;
    let millis: i64 = clock.millis.parse().ok()?;

    let total_ms = hour
        .checked_mul(60)?
        .checked_add(minute)?
        .checked_mul(60)?
        .checked_add(second)?
        .checked_mul(1000)?
        .checked_add(millis)?;

    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_milliseconds(total_ms)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::match_clock;
    use chrono::Timelike;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_24_hour_conversion() {
        assert_eq!(to_24_hour(11, true), 23);
        assert_eq!(to_24_hour(12, true), 12);
        assert_eq!(to_24_hour(12, false), 0);
        assert_eq!(to_24_hour(9, false), 9);
    }

    #[test]
    fn test_last_millisecond_of_day() {
        let clock = match_clock("11:59:59 PM.999").unwrap();
        let t = on_date(&clock, date()).unwrap();
        assert_eq!(t.date(), date());
        assert_eq!((t.hour(), t.minute(), t.second()), (23, 59, 59));
        assert_eq!(t.nanosecond(), 999_000_000);
    }

    #[test]
    fn test_midnight() {
        let clock = match_clock("12:00:00 AM.000").unwrap();
        let t = on_date(&clock, date()).unwrap();
        assert_eq!(t, date().and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_out_of_range_fields_roll_over() {
        let clock = match_clock("10:75:00 AM.0").unwrap();
        let t = on_date(&clock, date()).unwrap();
        assert_eq!((t.hour(), t.minute()), (11, 15));

        let clock = match_clock("13:00:00 PM.0").unwrap();
        let t = on_date(&clock, date()).unwrap();
        assert_eq!(t.date(), date());
        assert_eq!(t.hour(), 13);
    }

    #[test]
    fn test_millis_are_not_scaled() {
        // "5" is five milliseconds, not half a second
        let clock = match_clock("1:00:00 PM.5").unwrap();
        let t = on_date(&clock, date()).unwrap();
        assert_eq!(t.nanosecond(), 5_000_000);
    }

    #[test]
    fn test_huge_fields_are_unparseable() {
        let clock = match_clock("99999999999999999999:00:00 AM.0").unwrap();
        assert!(on_date(&clock, date()).is_none());
    }
}
