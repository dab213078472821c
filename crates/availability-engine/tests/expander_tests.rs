//! Tests for slot expansion.

use availability_engine::expander::{expand_rule, expand_rules, expand_window};
use availability_engine::rule::{AvailabilityRule, SlotTime};
use availability_engine::DayOfWeek;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(s: &str) -> SlotTime {
    s.parse().unwrap()
}

fn window(start: &str, end: &str, minutes: u32) -> Vec<String> {
    expand_window(t(start), t(end), minutes)
        .map(|s| s.to_string())
        .collect()
}

fn rule(start: &str, end: &str, minutes: u32) -> AvailabilityRule {
    AvailabilityRule::weekly(DayOfWeek::Monday, t(start), t(end), minutes)
}

// ── Boundaries ──────────────────────────────────────────────────────────────

#[test]
fn end_boundary_is_never_emitted() {
    assert_eq!(window("08:00", "09:00", 30), vec!["08:00", "08:30"]);
}

#[test]
fn trailing_remainder_produces_no_slot() {
    // 08:30 + 30 would end at 09:00, past the 08:50 close.
    assert_eq!(window("08:00", "08:50", 30), vec!["08:00"]);
    assert_eq!(window("08:00", "09:10", 30), vec!["08:00", "08:30"]);
}

#[test]
fn window_exactly_one_slot_long() {
    assert_eq!(window("10:00", "10:45", 45), vec!["10:00"]);
}

#[test]
fn window_shorter_than_one_slot_is_empty() {
    assert!(window("10:00", "10:15", 20).is_empty());
}

#[test]
fn crosses_hour_boundaries_with_odd_durations() {
    assert_eq!(
        window("08:50", "10:00", 20),
        vec!["08:50", "09:10", "09:30"]
    );
}

#[test]
fn runs_up_to_end_of_day() {
    let slots = window("22:00", "23:59", 60);
    assert_eq!(slots, vec!["22:00"]);
    let slots = window("00:00", "23:59", 15);
    assert_eq!(slots.len(), 95);
    assert_eq!(slots.first().unwrap(), "00:00");
    assert_eq!(slots.last().unwrap(), "23:30");
}

// ── Malformed input ─────────────────────────────────────────────────────────

#[test]
fn zero_duration_yields_nothing_instead_of_looping() {
    assert!(window("08:00", "12:00", 0).is_empty());
    assert_eq!(expand_rule(&rule("08:00", "12:00", 0)).count(), 0);
}

#[test]
fn inverted_or_empty_window_yields_nothing() {
    assert!(window("12:00", "08:00", 30).is_empty());
    assert!(window("12:00", "12:00", 30).is_empty());
    assert_eq!(expand_rule(&rule("12:00", "08:00", 30)).count(), 0);
}

// ── Iterator behaviour ──────────────────────────────────────────────────────

#[test]
fn iterator_is_exact_sized_and_fused() {
    let mut iter = expand_window(t("09:00"), t("10:00"), 20);
    assert_eq!(iter.len(), 3);
    iter.next();
    assert_eq!(iter.len(), 2);
    iter.next();
    iter.next();
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
    assert_eq!(iter.len(), 0);
}

#[test]
fn iterator_restarts_from_the_first_slot() {
    let mut iter = expand_window(t("09:00"), t("10:00"), 30);
    assert_eq!(iter.next(), Some(t("09:00")));
    let fresh: Vec<SlotTime> = iter.restart().collect();
    assert_eq!(fresh, vec![t("09:00"), t("09:30")]);
    let rest: Vec<SlotTime> = iter.collect();
    assert_eq!(rest, vec![t("09:30")]);
}

// ── Multiple rules ──────────────────────────────────────────────────────────

#[test]
fn multiple_rules_are_concatenated_and_sorted() {
    let rules = [rule("14:00", "15:00", 30), rule("08:00", "09:00", 30)];
    let slots: Vec<String> = expand_rules(&rules).iter().map(|s| s.to_string()).collect();
    assert_eq!(slots, vec!["08:00", "08:30", "14:00", "14:30"]);
}

#[test]
fn colliding_times_from_overlapping_rules_collapse() {
    let rules = [rule("08:00", "10:00", 30), rule("09:00", "10:00", 20)];
    let slots: Vec<String> = expand_rules(&rules).iter().map(|s| s.to_string()).collect();
    assert_eq!(
        slots,
        vec!["08:00", "08:30", "09:00", "09:20", "09:30", "09:40"]
    );
}

#[test]
fn malformed_rule_among_good_ones_contributes_nothing() {
    let rules = [rule("08:00", "09:00", 30), rule("10:00", "09:00", 30)];
    assert_eq!(expand_rules(&rules), vec![t("08:00"), t("08:30")]);
}

#[test]
fn no_rules_expand_to_nothing() {
    let rules: [AvailabilityRule; 0] = [];
    assert!(expand_rules(&rules).is_empty());
}
