use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use url::form_urlencoded;

use crate::models::event::EventRecord;

pub const CALENDAR_RENDER_URL: &str = "https://www.google.com/calendar/render";

// Appended unencoded; the LINE client opens the link outside its in-app browser.
const EXTERNAL_BROWSER_FLAG: &str = "openExternalBrowser=1";
const DETAILS_PREFIX: &str = "source message: ";
const TIMED_FORMAT: &str = "%Y%m%dT%H%M%S";
const ALL_DAY_FORMAT: &str = "%Y%m%d";

pub struct CalendarLinkBuilder {
    base_url: String,
}

impl Default for CalendarLinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarLinkBuilder {
    pub fn new() -> Self {
        Self::with_base_url(CALENDAR_RENDER_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    pub fn build(&self, record: &EventRecord) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &record.title)
            .append_pair("dates", &format_dates(record))
            .append_pair("location", &record.location)
            .append_pair("details", &format!("{}{}", DETAILS_PREFIX, record.source_text))
            .finish();
        format!("{}?{}&{}", self.base_url, query, EXTERNAL_BROWSER_FLAG)
    }
}

/// Encodes the event span as `start/end`.
///
/// Timed events last one hour and use `YYYYMMDDTHHMMSS`. All-day events use
/// `YYYYMMDD` with an exclusive end date, the day after the event.
pub fn format_dates(record: &EventRecord) -> String {
    let timed_start = record
        .hour
        .and_then(|h| record.start_date.and_hms_opt(h, 0, 0));
    match timed_start {
        Some(start) => {
            let end = start
                .checked_add_signed(Duration::hours(1))
                .unwrap_or(start);
            format!("{}/{}", start.format(TIMED_FORMAT), end.format(TIMED_FORMAT))
        }
        None => {
            let start = record.start_date;
            let end = start.succ_opt().unwrap_or(start);
            format!("{}/{}", start.format(ALL_DAY_FORMAT), end.format(ALL_DAY_FORMAT))
        }
    }
}

/// Inverse of [`format_dates`]: recovers the start date and hour.
///
/// Returns `None` when the value is malformed or its end does not match the
/// span `format_dates` would have produced.
pub fn parse_dates(value: &str) -> Option<(NaiveDate, Option<u32>)> {
    let (start, end) = value.split_once('/')?;
    if start.contains('T') {
        let start = NaiveDateTime::parse_from_str(start, TIMED_FORMAT).ok()?;
        let end = NaiveDateTime::parse_from_str(end, TIMED_FORMAT).ok()?;
        if end - start != Duration::hours(1) {
            return None;
        }
        Some((start.date(), Some(start.hour())))
    } else {
        let start = NaiveDate::parse_from_str(start, ALL_DAY_FORMAT).ok()?;
        let end = NaiveDate::parse_from_str(end, ALL_DAY_FORMAT).ok()?;
        if start.succ_opt()? != end {
            return None;
        }
        Some((start, None))
    }
}
