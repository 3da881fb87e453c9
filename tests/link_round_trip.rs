use calendarLinkBot::models::event::EventRecord;
use calendarLinkBot::service::extractor::EventExtractor;
use calendarLinkBot::service::link_builder::{parse_dates, CalendarLinkBuilder};
use chrono::{NaiveDate, NaiveDateTime};
use url::Url;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn query_value(link: &str, key: &str) -> Option<String> {
    let url = Url::parse(link).unwrap();
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn link_for(text: &str) -> String {
    let extractor = EventExtractor::new().unwrap();
    CalendarLinkBuilder::new().build(&extractor.extract(text, now()))
}

#[test]
fn all_day_explicit_date() {
    let link = link_for("2027年10月15日 打ち合わせ");
    assert_eq!(query_value(&link, "dates").as_deref(), Some("20271015/20271016"));
    assert_eq!(query_value(&link, "action").as_deref(), Some("TEMPLATE"));
}

#[test]
fn timed_explicit_date_resolves_year() {
    let link = link_for("10月15日 14時 歯医者");
    assert_eq!(
        query_value(&link, "dates").as_deref(),
        Some("20261015T140000/20261015T150000")
    );
}

#[test]
fn plain_message_link() {
    let link = link_for("ミーティング");
    assert_eq!(query_value(&link, "dates").as_deref(), Some("20261018/20261019"));
    assert_eq!(query_value(&link, "text").as_deref(), Some("ミーティング"));
    assert_eq!(query_value(&link, "location").as_deref(), Some(""));
    assert_eq!(
        query_value(&link, "details").as_deref(),
        Some("source message: ミーティング")
    );
}

#[test]
fn details_carry_untouched_original() {
    let original = "佐藤さんと13時に渡辺で会議";
    let link = link_for(original);
    assert_eq!(
        query_value(&link, "details"),
        Some(format!("source message: {}", original))
    );
    assert_eq!(query_value(&link, "text").as_deref(), Some("【佐藤さん】会議"));
    assert_eq!(query_value(&link, "location").as_deref(), Some("渡辺"));
}

#[test]
fn browser_flag_is_a_literal_suffix() {
    let link = link_for("明日 会議");
    assert!(link.ends_with("&openExternalBrowser=1"));
    assert_eq!(query_value(&link, "openExternalBrowser").as_deref(), Some("1"));
    assert!(link.is_ascii());
}

#[test]
fn title_with_spaces_and_brackets_is_reversible() {
    let record = EventRecord {
        title: "【山田様】週次 定例 (A&B) 100%".to_string(),
        attendee: "山田様".to_string(),
        location: "本社 3F".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        hour: Some(9),
        source_text: "山田様と本社 3Fで週次 定例 (A&B) 100%".to_string(),
    };
    let link = CalendarLinkBuilder::new().build(&record);
    assert!(!link.contains(' '));
    assert_eq!(query_value(&link, "text").as_deref(), Some(record.title.as_str()));
    assert_eq!(query_value(&link, "location").as_deref(), Some("本社 3F"));
}

#[test]
fn dates_round_trip_for_every_hour_and_all_day() {
    let builder = CalendarLinkBuilder::new();
    let dates = [
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2028, 2, 29).unwrap(),
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
    ];
    let hours = std::iter::once(None).chain((0..24).map(Some));
    for hour in hours {
        for date in dates {
            let record = EventRecord {
                title: "x".to_string(),
                attendee: String::new(),
                location: String::new(),
                start_date: date,
                hour,
                source_text: "x".to_string(),
            };
            let link = builder.build(&record);
            let encoded = query_value(&link, "dates").unwrap();
            assert_eq!(parse_dates(&encoded), Some((date, hour)), "{}", encoded);
        }
    }
}
