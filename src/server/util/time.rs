//! Office-local calendar helpers.
//!
//! Timestamps are stored in UTC; "today" and the "current year" are computed in the
//! configured office offset.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

/// Builds a fixed offset from whole hours, falling back to UTC when out of range.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Current local date in the office offset.
pub fn today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Current local year in the office offset.
pub fn current_year(offset: FixedOffset) -> i32 {
    today(offset).year()
}

/// Parses an `HH:MM` time of day.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Every date from `start` to `end`, both inclusive. Empty when `end < start`.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(1);
    }
    dates
}

/// Hours between two instants rounded to one decimal place.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let minutes = (end - start).num_minutes() as f64;
    (minutes / 60.0 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hhmm() {
        assert_eq!(parse_hhmm("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert!(parse_hhmm("25:00").is_none());
        assert!(parse_hhmm("9am").is_none());
    }

    #[test]
    fn lists_inclusive_date_range() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();

        let dates = dates_between(start, end);

        assert_eq!(dates.len(), 4);
        assert_eq!(dates[3], end);
        assert!(dates_between(end, start).is_empty());
    }

    #[test]
    fn rounds_hours_to_one_decimal() {
        let start = DateTime::parse_from_rfc3339("2025-05-01T18:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let end = start + Duration::minutes(100);

        assert_eq!(hours_between(start, end), 1.7);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        assert_eq!(offset_from_hours(99).local_minus_utc(), 0);
        assert_eq!(offset_from_hours(8).local_minus_utc(), 8 * 3600);
    }
}
