use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::service::extractor::EventExtractor;
use crate::service::link_builder::CalendarLinkBuilder;

pub const CONFIRMATION: &str = "カレンダー登録リンクを作成しました！";
pub const APOLOGY: &str = "申し訳ありません。カレンダーリンクを作成できませんでした。";

pub trait LinkComposer: Send + Sync {
    fn link_for(&self, text: &str, now: NaiveDateTime) -> String;
}

/// Extractor followed by builder, with nothing shared between calls.
pub struct CalendarLinks {
    extractor: EventExtractor,
    builder: CalendarLinkBuilder,
}

impl CalendarLinks {
    pub fn new(extractor: EventExtractor, builder: CalendarLinkBuilder) -> Self {
        Self { extractor, builder }
    }
}

impl LinkComposer for CalendarLinks {
    fn link_for(&self, text: &str, now: NaiveDateTime) -> String {
        let record = self.extractor.extract(text, now);
        self.builder.build(&record)
    }
}

#[derive(Clone)]
pub struct ReplyService {
    composer: Arc<dyn LinkComposer>,
}

impl ReplyService {
    pub fn new(composer: Arc<dyn LinkComposer>) -> Self {
        Self { composer }
    }

    /// Reply text for one inbound message. A defect inside the core is
    /// contained here and answered with a fixed apology.
    pub fn compose(&self, text: &str, now: NaiveDateTime) -> String {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.composer.link_for(text, now)));
        match result {
            Ok(url) => render_reply(&url),
            Err(cause) => {
                let cause = cause
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| cause.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("Failed to build calendar link for {:?}: {}", text, cause);
                APOLOGY.to_string()
            }
        }
    }
}

pub fn render_reply(url: &str) -> String {
    format!("{}\n\n{}", CONFIRMATION, url)
}
