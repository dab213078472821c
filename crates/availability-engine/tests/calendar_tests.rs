//! Tests for weekday and date-key utilities.

use availability_engine::calendar::{date_key, day_of_week, parse_date_key, DayOfWeek};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Weekday mapping ─────────────────────────────────────────────────────────

#[test]
fn known_dates_map_to_expected_weekdays() {
    assert_eq!(day_of_week(date(2024, 3, 4)), DayOfWeek::Monday);
    assert_eq!(day_of_week(date(2024, 3, 10)), DayOfWeek::Sunday);
    assert_eq!(day_of_week(date(2024, 2, 29)), DayOfWeek::Thursday);
    assert_eq!(day_of_week(date(2000, 1, 1)), DayOfWeek::Saturday);
    assert_eq!(day_of_week(date(2026, 12, 31)), DayOfWeek::Thursday);
}

#[test]
fn numbering_is_sunday_first() {
    let numbers: Vec<u8> = DayOfWeek::ALL.iter().map(|d| d.number()).collect();
    assert_eq!(numbers, vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(DayOfWeek::Sunday.number(), 0);
    assert_eq!(DayOfWeek::Saturday.number(), 6);
}

#[test]
fn from_number_inverts_number() {
    for day in DayOfWeek::ALL {
        assert_eq!(DayOfWeek::from_number(day.number()), Some(day));
    }
    assert_eq!(DayOfWeek::from_number(7), None);
}

#[test]
fn a_week_of_consecutive_dates_covers_every_weekday_once() {
    let start = date(2024, 12, 29); // a Sunday, crossing a year boundary
    let days: Vec<DayOfWeek> = (0..7)
        .map(|i| day_of_week(start + chrono::Duration::days(i)))
        .collect();
    assert_eq!(days, DayOfWeek::ALL.to_vec());
}

// ── Names ───────────────────────────────────────────────────────────────────

#[test]
fn weekday_names_parse_case_insensitively() {
    assert_eq!("MONDAY".parse::<DayOfWeek>().unwrap(), DayOfWeek::Monday);
    assert_eq!("friday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Friday);
    assert_eq!(" Sunday ".parse::<DayOfWeek>().unwrap(), DayOfWeek::Sunday);
}

#[test]
fn unknown_weekday_name_is_rejected() {
    assert!("LUNES".parse::<DayOfWeek>().is_err());
    assert!("".parse::<DayOfWeek>().is_err());
}

#[test]
fn weekday_serializes_upper_case() {
    let json = serde_json::to_string(&DayOfWeek::Wednesday).unwrap();
    assert_eq!(json, "\"WEDNESDAY\"");
    let back: DayOfWeek = serde_json::from_str("\"TUESDAY\"").unwrap();
    assert_eq!(back, DayOfWeek::Tuesday);
}

// ── Date keys ───────────────────────────────────────────────────────────────

#[test]
fn date_key_is_zero_padded_iso() {
    assert_eq!(date_key(date(2024, 3, 4)), "2024-03-04");
    assert_eq!(date_key(date(987, 1, 9)), "0987-01-09");
}

#[test]
fn parse_date_key_reads_calendar_components() {
    assert_eq!(parse_date_key("2024-03-04").unwrap(), date(2024, 3, 4));
}

#[test]
fn parse_date_key_rejects_impossible_or_malformed_dates() {
    assert!(parse_date_key("2023-02-29").is_err());
    assert!(parse_date_key("2024-13-01").is_err());
    assert!(parse_date_key("04/03/2024").is_err());
    assert!(parse_date_key("2024-03-04T00:00:00Z").is_err());
    assert!(parse_date_key("2024-3-4").is_err());
    assert!(parse_date_key("2024-03-4").is_err());
}
