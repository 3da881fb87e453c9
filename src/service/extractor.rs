use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::models::event::EventRecord;

const JAPANESE_DATE: &str = r"(?:([0-9０-９]{4})年)?([0-9０-９]{1,2})月([0-9０-９]{1,2})日";
const SLASH_DATE: &str = r"(?:([0-9０-９]{4})/)?([0-9０-９]{1,2})/([0-9０-９]{1,2})";
const HOUR: &str = r"([0-9０-９]{1,2})時";
const RELATIVE_DAYS: &str = r"(?:明後日|明日|今日)";

const ATTENDEE: &str = r"([^\s]+?)(?:さん|様|君|氏)と?";
const LOCATION: &str = r"([^\s]+?)で";
// A particle right after an honorific closes the name phrase.
const HONORIFIC_BOUNDARY: &str = r"(さん|様|君|氏)[とに]";
const HONORIFIC_PARTICLES: [char; 2] = ['と', 'に'];

const HONORIFIC_CONJUNCTION: char = 'と';
const LOCATIVE: &str = "で";
const FROM_MARKER: &str = "から";
const STRIPPED_PARTICLES: [&str; 3] = ["で", "から", "の"];

// Hours past midnight written as 24時..29時 belong to the next day.
const LATE_NIGHT_LIMIT: u32 = 29;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRuleKind {
    JapaneseDate,
    SlashDate,
    DayAfterTomorrow,
    Tomorrow,
    Today,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMatch {
    Valid(NaiveDate),
    /// Matched syntactically but names no real calendar day.
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMatch {
    NotFound,
    Hour(u32),
    NextDayHour(u32),
    OutOfRange(u32),
}

/// Parses ASCII or full-width (`０`..`９`) digits.
fn parse_digits<T: FromStr>(digits: &str) -> Option<T> {
    let ascii: String = digits
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect();
    ascii.parse().ok()
}

#[derive(Debug)]
enum DateMatcher {
    Pattern(Regex),
    Keyword { literal: &'static str, offset_days: u64 },
}

#[derive(Debug)]
pub struct DateRule {
    kind: DateRuleKind,
    matcher: DateMatcher,
}

impl DateRule {
    pub fn kind(&self) -> DateRuleKind {
        self.kind
    }

    fn apply(&self, text: &str, today: NaiveDate) -> Option<DateMatch> {
        match &self.matcher {
            DateMatcher::Pattern(pattern) => {
                let caps = pattern.captures(text)?;
                let year = match caps.get(1) {
                    Some(y) => parse_digits::<i32>(y.as_str()),
                    None => Some(today.year()),
                };
                let month = parse_digits::<u32>(&caps[2]);
                let day = parse_digits::<u32>(&caps[3]);
                let date = match (year, month, day) {
                    (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d),
                    _ => None,
                };
                Some(date.map_or(DateMatch::Invalid, DateMatch::Valid))
            }
            DateMatcher::Keyword { literal, offset_days } => {
                if !text.contains(*literal) {
                    return None;
                }
                Some(
                    today
                        .checked_add_days(Days::new(*offset_days))
                        .map_or(DateMatch::Invalid, DateMatch::Valid),
                )
            }
        }
    }
}

/// Turns a free-form Japanese chat message into an [`EventRecord`].
///
/// All patterns are compiled once in [`EventExtractor::new`]; extraction itself
/// never fails and never reads the clock.
#[derive(Debug)]
pub struct EventExtractor {
    date_rules: Vec<DateRule>,
    hour_pattern: Regex,
    attendee_pattern: Regex,
    location_pattern: Regex,
    honorific_boundary: Regex,
    temporal_cleanup: Vec<Regex>,
}

impl EventExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        // First match wins.
        let date_rules = vec![
            DateRule {
                kind: DateRuleKind::JapaneseDate,
                matcher: DateMatcher::Pattern(Regex::new(JAPANESE_DATE)?),
            },
            DateRule {
                kind: DateRuleKind::SlashDate,
                matcher: DateMatcher::Pattern(Regex::new(SLASH_DATE)?),
            },
            DateRule {
                kind: DateRuleKind::DayAfterTomorrow,
                matcher: DateMatcher::Keyword { literal: "明後日", offset_days: 2 },
            },
            DateRule {
                kind: DateRuleKind::Tomorrow,
                matcher: DateMatcher::Keyword { literal: "明日", offset_days: 1 },
            },
            DateRule {
                kind: DateRuleKind::Today,
                matcher: DateMatcher::Keyword { literal: "今日", offset_days: 0 },
            },
        ];

        // Each temporal token also takes a directly following "に" with it.
        let temporal_cleanup = [JAPANESE_DATE, SLASH_DATE, RELATIVE_DAYS, HOUR]
            .iter()
            .map(|p| Regex::new(&format!("{}に?", p)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            date_rules,
            hour_pattern: Regex::new(HOUR)?,
            attendee_pattern: Regex::new(ATTENDEE)?,
            location_pattern: Regex::new(LOCATION)?,
            honorific_boundary: Regex::new(HONORIFIC_BOUNDARY)?,
            temporal_cleanup,
        })
    }

    pub fn date_rules(&self) -> &[DateRule] {
        &self.date_rules
    }

    pub fn extract(&self, text: &str, now: NaiveDateTime) -> EventRecord {
        let today = now.date();
        let (mut start_date, _) = self.resolve_date(text, today);

        let hour = match self.resolve_time(text) {
            TimeMatch::Hour(h) => Some(h),
            TimeMatch::NextDayHour(h) => match start_date.checked_add_days(Days::new(1)) {
                Some(next) => {
                    start_date = next;
                    Some(h)
                }
                None => None,
            },
            TimeMatch::NotFound | TimeMatch::OutOfRange(_) => None,
        };

        let scan = self.mask_phrases(text);
        let location = self
            .location_pattern
            .captures(&scan)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();
        let attendee = self.find_attendee(&scan, &location);

        let cleaned = self.clean_title(text, &attendee, &location);
        let title = if attendee.is_empty() {
            cleaned
        } else {
            format!("【{}】{}", attendee, cleaned)
        };

        EventRecord {
            title,
            attendee,
            location,
            start_date,
            hour,
            source_text: text.to_string(),
        }
    }

    /// Walks the date rules in priority order. An invalid explicit date stops
    /// the walk and resolves to `today`.
    pub fn resolve_date(&self, text: &str, today: NaiveDate) -> (NaiveDate, Option<DateRuleKind>) {
        for rule in &self.date_rules {
            match rule.apply(text, today) {
                Some(DateMatch::Valid(date)) => return (date, Some(rule.kind)),
                Some(DateMatch::Invalid) => return (today, Some(rule.kind)),
                None => continue,
            }
        }
        (today, None)
    }

    pub fn resolve_time(&self, text: &str) -> TimeMatch {
        let Some(caps) = self.hour_pattern.captures(text) else {
            return TimeMatch::NotFound;
        };
        let Some(hour) = parse_digits::<u32>(&caps[1]) else {
            return TimeMatch::NotFound;
        };
        match hour {
            0..=23 => TimeMatch::Hour(hour),
            24..=LATE_NIGHT_LIMIT => TimeMatch::NextDayHour(hour - 24),
            _ => TimeMatch::OutOfRange(hour),
        }
    }

    /// Blanks out dates, times, `から` and the particle closing an honorific
    /// phrase, so the name and place runs cannot reach across them.
    fn mask_phrases(&self, text: &str) -> String {
        let mut scan = text.to_string();
        for pattern in &self.temporal_cleanup {
            scan = pattern.replace_all(&scan, " ").into_owned();
        }
        scan = scan.replace(FROM_MARKER, " ");
        self.honorific_boundary
            .replace_all(&scan, "${1} ")
            .into_owned()
    }

    /// Looks for the name outside the location phrase first. A name that only
    /// occurs inside the place (`佐藤さんの家で`) is still taken from there.
    fn find_attendee(&self, scan: &str, location: &str) -> String {
        let outside = if location.is_empty() {
            scan.to_string()
        } else {
            scan.replace(&format!("{}{}", location, LOCATIVE), " ")
        };
        let found = self
            .attendee_pattern
            .find(&outside)
            .or_else(|| self.attendee_pattern.find(scan));
        match found {
            Some(m) => {
                let phrase = m.as_str();
                phrase
                    .strip_suffix(HONORIFIC_CONJUNCTION)
                    .unwrap_or(phrase)
                    .to_string()
            }
            None => String::new(),
        }
    }

    fn clean_title(&self, text: &str, attendee: &str, location: &str) -> String {
        let mut title = text.to_string();
        if !location.is_empty() {
            title = title.replace(&format!("{}{}", location, LOCATIVE), "");
        }
        if !attendee.is_empty() {
            for particle in HONORIFIC_PARTICLES {
                title = title.replace(&format!("{}{}", attendee, particle), "");
            }
            title = title.replace(attendee, "");
        }
        for pattern in &self.temporal_cleanup {
            title = pattern.replace_all(&title, "").into_owned();
        }
        for particle in STRIPPED_PARTICLES {
            title = title.replace(particle, "");
        }
        title = title.replace(HONORIFIC_CONJUNCTION, "");
        title.trim().to_string()
    }
}
