use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One record per inbound message. Built by the extractor, read by the link builder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub title: String,
    pub attendee: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub hour: Option<u32>,
    pub source_text: String,
}

impl EventRecord {
    /// An event without an hour is serialized as an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.hour.is_none()
    }
}
