//! Day-level composition of resolution, expansion and occupancy.
//!
//! [`resolve_day`] is the single entry point every booking surface goes
//! through: the public booking wizard, the internal appointment form and the
//! availability calendar all consume its [`DaySchedule`].

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::calendar::{day_of_week, DayOfWeek};
use crate::expander::expand_rules;
use crate::occupancy::{reconcile, Appointment, OccupancyPolicy, ResolvedSlot};
use crate::resolver::{has_availability, resolve_rules};
use crate::rule::{AvailabilityRule, RuleScope, SlotTime};

/// Everything the UI needs to render one date for one professional.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub day_of_week: DayOfWeek,
    /// The rules that governed this date after override precedence.
    pub rules: Vec<AvailabilityRule>,
    /// Chronological, duplicate-free slots with their occupancy.
    pub slots: Vec<ResolvedSlot>,
}

impl DaySchedule {
    pub fn available_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_available).count()
    }

    pub fn available_times(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.slots.iter().filter(|s| s.is_available).map(|s| s.time)
    }

    /// True when no rule governs the date (closed or unscheduled day).
    pub fn is_closed(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Slot start times for `date`, without occupancy.
pub fn slots_for_date(rules: &[AvailabilityRule], date: NaiveDate) -> Vec<SlotTime> {
    expand_rules(resolve_rules(rules, date))
}

/// Resolve, expand and reconcile one date.
///
/// `appointments` must belong to the same professional and date; see
/// [`crate::occupancy::appointments_on`].
pub fn resolve_day<'a, I>(
    rules: &[AvailabilityRule],
    date: NaiveDate,
    appointments: I,
    policy: OccupancyPolicy,
) -> DaySchedule
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let governing = resolve_rules(rules, date);
    let times = expand_rules(governing.iter().copied());
    let slots = reconcile(&times, appointments, policy);

    let schedule = DaySchedule {
        date,
        day_of_week: day_of_week(date),
        rules: governing.into_iter().cloned().collect(),
        slots,
    };
    debug!(
        %date,
        rules = schedule.rules.len(),
        slots = schedule.slots.len(),
        available = schedule.available_count(),
        "resolved day schedule"
    );
    schedule
}

/// Dates after `today`, up to `horizon_days` ahead, that have availability.
///
/// `today` itself is never offered; the first candidate is the day after.
pub fn bookable_dates(
    rules: &[AvailabilityRule],
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<NaiveDate> {
    (1..=u64::from(horizon_days))
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter(|date| has_availability(rules, *date))
        .collect()
}

/// Rules arranged for calendar-style display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroups {
    /// Weekly rules by weekday, Sunday first.
    pub weekly: BTreeMap<DayOfWeek, Vec<AvailabilityRule>>,
    /// Specific-date rules by date, ascending.
    pub specific: BTreeMap<NaiveDate, Vec<AvailabilityRule>>,
}

/// Group rules by weekday and by date, each group ordered by start time.
///
/// Inactive rules are kept; the calendar shows them for editing.
pub fn group_rules(rules: &[AvailabilityRule]) -> RuleGroups {
    let mut groups = RuleGroups::default();
    for rule in rules {
        let bucket = match rule.scope {
            RuleScope::Weekly(day) => groups.weekly.entry(day).or_default(),
            RuleScope::SpecificDate(date) => groups.specific.entry(date).or_default(),
        };
        bucket.push(rule.clone());
    }
    for bucket in groups.weekly.values_mut().chain(groups.specific.values_mut()) {
        bucket.sort_by_key(|r| (r.start_time, r.end_time));
    }
    groups
}
