//! Rule resolution -- which of a professional's rules govern a given date.
//!
//! Specific-date rules override the weekly schedule wholesale. If any rule is
//! pinned to the date, only those rules are considered, even when every one
//! of them is inactive: an all-inactive set closes the day and the weekly
//! rules for that weekday are not consulted.

use chrono::NaiveDate;
use tracing::trace;

use crate::calendar::{date_key, day_of_week};
use crate::rule::{AvailabilityRule, RuleScope};

/// Return the rules that govern `date`, in input order.
///
/// 1. Collect rules scoped to this exact date (active or not).
/// 2. If there are any, return only the active ones among them.
/// 3. Otherwise return the active weekly rules for the date's weekday.
///
/// Never fails; no matching rules simply means no availability.
pub fn resolve_rules(rules: &[AvailabilityRule], date: NaiveDate) -> Vec<&AvailabilityRule> {
    let key = date_key(date);

    let pinned: Vec<&AvailabilityRule> = rules
        .iter()
        .filter(|rule| rule.scope.matches_date_key(&key))
        .collect();

    if !pinned.is_empty() {
        let active: Vec<&AvailabilityRule> = pinned.into_iter().filter(|r| r.active).collect();
        trace!(date = %key, rules = active.len(), "specific-date override");
        return active;
    }

    let weekday = day_of_week(date);
    let weekly: Vec<&AvailabilityRule> = rules
        .iter()
        .filter(|rule| rule.active && rule.scope == RuleScope::Weekly(weekday))
        .collect();
    trace!(date = %key, %weekday, rules = weekly.len(), "weekly schedule");
    weekly
}

/// Whether `date` has at least one governing active rule.
pub fn has_availability(rules: &[AvailabilityRule], date: NaiveDate) -> bool {
    !resolve_rules(rules, date).is_empty()
}
