//! Slot expansion -- converts a rule's time window into discrete start times.
//!
//! A window `[start, end)` with a slot duration `d` yields `start`,
//! `start + d`, ... for as long as a whole slot still fits before `end`. A
//! trailing remainder shorter than `d` produces nothing; it is never
//! truncated or rounded into a slot.

use std::collections::BTreeSet;
use std::iter::FusedIterator;

use tracing::warn;

use crate::rule::{AvailabilityRule, SlotTime};

/// Lazy, finite sequence of slot start times for one window.
///
/// Cloning gives an independent iterator from the same position, and
/// [`SlotIter::restart`] rewinds to the first slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotIter {
    start: u32,
    next: u32,
    end: u32,
    step: u32,
}

impl SlotIter {
    /// A fresh iterator positioned on the first slot.
    pub fn restart(&self) -> SlotIter {
        SlotIter {
            next: self.start,
            ..self.clone()
        }
    }

    fn exhausted(&self) -> bool {
        self.step == 0 || self.next.saturating_add(self.step) > self.end
    }

    fn remaining(&self) -> usize {
        if self.exhausted() {
            0
        } else {
            ((self.end - self.next) / self.step) as usize
        }
    }
}

impl Iterator for SlotIter {
    type Item = SlotTime;

    fn next(&mut self) -> Option<SlotTime> {
        if self.exhausted() {
            return None;
        }
        let current = self.next;
        self.next += self.step;
        SlotTime::from_minutes(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for SlotIter {}

impl FusedIterator for SlotIter {}

/// Expand a `[start, end)` window into slot start times.
///
/// A zero duration or an empty/inverted window yields an empty iterator.
pub fn expand_window(start: SlotTime, end: SlotTime, slot_duration_minutes: u32) -> SlotIter {
    let (start, end) = (start.minutes(), end.minutes());
    SlotIter {
        start,
        next: start,
        end: end.max(start),
        step: slot_duration_minutes,
    }
}

/// Expand a single rule. Malformed rules expand to nothing.
pub fn expand_rule(rule: &AvailabilityRule) -> SlotIter {
    if let Err(e) = rule.validate() {
        warn!(error = %e, "skipping malformed availability rule");
    }
    expand_window(rule.start_time, rule.end_time, rule.slot_duration_minutes)
}

/// Expand every rule, merge the results, drop duplicate times and sort
/// chronologically.
///
/// Two blocks that produce the same `HH:mm` collapse into a single slot.
pub fn expand_rules<'a, I>(rules: I) -> Vec<SlotTime>
where
    I: IntoIterator<Item = &'a AvailabilityRule>,
{
    rules
        .into_iter()
        .flat_map(expand_rule)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
