//! Date helpers for meal logs

use chrono::{Days, Local, NaiveDate};

/// ISO date format used in the database and tool parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse an ISO date, returning `None` if malformed
pub fn parse_date_strict(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse an ISO date, falling back to today
pub fn parse_date(s: &str) -> NaiveDate {
    parse_date_strict(s).unwrap_or_else(|| {
        tracing::warn!(date = s, "Invalid date, using today");
        today()
    })
}

/// `days` consecutive dates ending at `end`, oldest first.
/// `None` if the range would start before the earliest representable date.
pub fn date_range(end: NaiveDate, days: u32) -> Option<Vec<NaiveDate>> {
    (0..days)
        .rev()
        .map(|offset| end.checked_sub_days(Days::new(u64::from(offset))))
        .collect()
}
