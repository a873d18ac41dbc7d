use bizchart::core::{
    RangeToken, SeriesBundle, TimeRangeFilter, parse_date_label, utc_offset,
};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

fn dates(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| (*label).to_owned()).collect()
}

fn instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid instant")
        .with_timezone(&Utc)
}

fn three_day_bundle() -> SeriesBundle {
    SeriesBundle::from_dense(
        dates(&["2024-01-01", "2024-01-02", "2024-01-03"]),
        [("revenue", vec![100.0, 200.0, 300.0])],
    )
    .expect("valid bundle")
}

#[test]
fn day_window_keeps_last_date_only() {
    let filter = TimeRangeFilter::default();
    let now = instant("2024-01-03T12:00:00Z");

    let sliced = filter.apply(&three_day_bundle(), RangeToken::Day, now);

    assert_eq!(sliced.dates(), ["2024-01-03"]);
    assert_eq!(sliced.series("revenue").expect("revenue"), [Some(300.0)]);
}

#[test]
fn all_returns_bundle_unchanged() {
    let bundle = three_day_bundle();
    let sliced = TimeRangeFilter::default().apply(&bundle, RangeToken::All, instant("2030-01-01T00:00:00Z"));
    assert_eq!(sliced, bundle);
}

#[test]
fn window_without_qualifying_dates_is_empty_with_same_keys() {
    let sliced = TimeRangeFilter::default().apply(
        &three_day_bundle(),
        RangeToken::Week,
        instant("2024-06-01T00:00:00Z"),
    );

    assert!(sliced.is_empty());
    assert!(sliced.series("revenue").expect("revenue kept").is_empty());
    assert_eq!(sliced.series_count(), 1);
}

#[test]
fn unparsable_labels_are_skipped_as_boundaries() {
    let bundle = SeriesBundle::from_dense(
        dates(&["2024-01-01", "garbage", "2024-01-03T06:00:00Z"]),
        [("clients", vec![1.0, 2.0, 3.0])],
    )
    .expect("valid bundle");

    let sliced = TimeRangeFilter::default().apply(
        &bundle,
        RangeToken::Day,
        instant("2024-01-03T12:00:00Z"),
    );

    assert_eq!(sliced.dates(), ["2024-01-03T06:00:00Z"]);
    assert_eq!(sliced.series("clients").expect("clients"), [Some(3.0)]);
}

#[test]
fn naive_timestamps_use_configured_local_offset() {
    let moscow = FixedOffset::east_opt(3 * 3600).expect("valid offset");

    let parsed = parse_date_label("2024-01-03 09:30", moscow).expect("parse naive timestamp");
    assert_eq!(parsed, instant("2024-01-03T06:30:00Z"));

    let parsed = parse_date_label("2024-01-03T09:30:15.250", moscow).expect("parse fractional");
    assert_eq!(
        parsed,
        Utc.with_ymd_and_hms(2024, 1, 3, 6, 30, 15).single().expect("instant")
            + chrono::TimeDelta::milliseconds(250)
    );

    let zoned = parse_date_label("2024-01-03T09:30:00+01:00", moscow).expect("parse zoned");
    assert_eq!(zoned, instant("2024-01-03T08:30:00Z"));
}

#[test]
fn parse_error_carries_label() {
    let err = parse_date_label("03/01/2024", utc_offset()).expect_err("unsupported format");
    assert_eq!(err.label, "03/01/2024");
}

#[test]
fn availability_reports_each_window() {
    let filter = TimeRangeFilter::default();
    let bundle = SeriesBundle::from_dense(
        dates(&["2023-11-01", "2023-12-20", "2024-01-03"]),
        [("revenue", vec![1.0, 2.0, 3.0])],
    )
    .expect("valid bundle");

    let availability = filter.availability(&bundle, instant("2024-01-10T00:00:00Z"));
    assert!(!availability.day);
    assert!(availability.week);
    assert!(availability.month);
    assert!(availability.quarter);
    assert!(availability.all);
    assert!(availability.is_available(RangeToken::Week));

    let empty = filter.availability(&SeriesBundle::empty(), instant("2024-01-10T00:00:00Z"));
    assert!(!empty.all);
    assert!(!empty.quarter);
}

#[test]
fn range_tokens_deserialize_from_snake_case() {
    let token: RangeToken = serde_json::from_str("\"quarter\"").expect("parse token");
    assert_eq!(token, RangeToken::Quarter);
    assert_eq!(RangeToken::default(), RangeToken::All);
}

#[test]
fn availability_matches_non_empty_slices() {
    let filter = TimeRangeFilter::default();
    let bundle = SeriesBundle::from_dense(
        dates(&["2023-09-15", "2023-12-20", "2024-01-09"]),
        [("revenue", vec![1.0, 2.0, 3.0])],
    )
    .expect("valid bundle");
    let now = instant("2024-01-10T06:00:00Z");

    let availability = filter.availability(&bundle, now);
    for token in RangeToken::TOKENS {
        assert_eq!(
            availability.is_available(token),
            !filter.apply(&bundle, token, now).is_empty(),
            "{token:?}"
        );
    }
}
