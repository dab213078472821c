//! Availability rule model.
//!
//! A rule is either a weekly-recurring block (`Weekly(day)`) or a block for a
//! single calendar date (`SpecificDate(date)`). Times are minute-granular;
//! seconds coming from the rule store are truncated on ingestion.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::calendar::{date_key, DayOfWeek};
use crate::error::{AvailabilityError, Result};
use crate::wire::RuleDto;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A minute-granular time of day, stored as minutes since midnight.
///
/// Ordering is chronological. Displays and serializes as zero-padded `HH:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(u16);

impl SlotTime {
    /// Build a time from hour and minute components.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidTime` when `hour > 23` or `minute > 59`.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(AvailabilityError::InvalidTime(format!(
                "{:02}:{:02}",
                hour, minute
            )));
        }
        Ok(SlotTime((hour * 60 + minute) as u16))
    }

    /// Build a time from minutes since midnight, if it is within the day.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY as u32).then_some(SlotTime(minutes as u16))
    }

    pub fn minutes(self) -> u32 {
        self.0 as u32
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Wire form with a zero seconds field (`HH:mm:00`).
    pub fn to_wire(self) -> String {
        format!("{}:00", self)
    }
}

impl From<NaiveTime> for SlotTime {
    /// Seconds and sub-seconds are discarded.
    fn from(time: NaiveTime) -> Self {
        SlotTime((time.hour() * 60 + time.minute()) as u16)
    }
}

impl From<SlotTime> for NaiveTime {
    fn from(time: SlotTime) -> Self {
        // A SlotTime is always within the day.
        NaiveTime::from_num_seconds_from_midnight_opt(time.minutes() * 60, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for SlotTime {
    type Err = AvailabilityError;

    /// Accepts `HH:mm`, `HH:mm:ss` and `HH:mm:ss.fff`; anything after the
    /// minutes is validated and then dropped.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AvailabilityError::InvalidTime(s.to_string());
        let mut parts = s.trim().split(':');

        let hour = parse_component(parts.next(), 2).ok_or_else(invalid)?;
        let minute = parse_component(parts.next(), 2).ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            let whole = seconds.split('.').next().unwrap_or_default();
            match parse_component(Some(whole), 2) {
                Some(sec) if sec < 60 => {}
                _ => return Err(invalid()),
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        SlotTime::new(hour, minute).map_err(|_| invalid())
    }
}

fn parse_component(part: Option<&str>, width: usize) -> Option<u32> {
    let part = part?;
    if part.is_empty() || part.len() > width || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl TryFrom<String> for SlotTime {
    type Error = AvailabilityError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SlotTime> for String {
    fn from(time: SlotTime) -> Self {
        time.to_string()
    }
}

/// Which dates a rule applies to. Exactly one variant, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleScope {
    Weekly(DayOfWeek),
    SpecificDate(NaiveDate),
}

impl RuleScope {
    pub fn is_weekly(&self) -> bool {
        matches!(self, RuleScope::Weekly(_))
    }

    /// True for a specific-date scope whose `yyyy-MM-dd` key equals `key`.
    pub fn matches_date_key(&self, key: &str) -> bool {
        match self {
            RuleScope::SpecificDate(date) => date_key(*date) == key,
            RuleScope::Weekly(_) => false,
        }
    }
}

/// A professional's availability block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleDto", into = "RuleDto")]
pub struct AvailabilityRule {
    /// Assigned by the rule store; `None` for rules not yet saved.
    pub id: Option<String>,
    pub scope: RuleScope,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub slot_duration_minutes: u32,
    /// Inactive rules are kept for display and editing but never resolved.
    pub active: bool,
}

impl AvailabilityRule {
    /// An active weekly rule with no id.
    pub fn weekly(
        day: DayOfWeek,
        start_time: SlotTime,
        end_time: SlotTime,
        slot_duration_minutes: u32,
    ) -> Self {
        Self {
            id: None,
            scope: RuleScope::Weekly(day),
            start_time,
            end_time,
            slot_duration_minutes,
            active: true,
        }
    }

    /// An active specific-date rule with no id.
    pub fn specific(
        date: NaiveDate,
        start_time: SlotTime,
        end_time: SlotTime,
        slot_duration_minutes: u32,
    ) -> Self {
        Self {
            id: None,
            scope: RuleScope::SpecificDate(date),
            start_time,
            end_time,
            slot_duration_minutes,
            active: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Check the authoring invariants: `start_time < end_time` and a
    /// positive slot duration.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidRule` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.start_time >= self.end_time {
            format!(
                "start time {} must be before end time {}",
                self.start_time, self.end_time
            )
        } else if self.slot_duration_minutes == 0 {
            "slot duration must be positive".to_string()
        } else {
            return Ok(());
        };
        Err(AvailabilityError::InvalidRule {
            rule_id: self.id.clone(),
            reason,
        })
    }
}

/// Validate every rule, returning one error per malformed rule in input order.
pub fn validate_rules(rules: &[AvailabilityRule]) -> Vec<AvailabilityError> {
    rules.iter().filter_map(|rule| rule.validate().err()).collect()
}
