//! Rule and appointment sources, and a cached service over them.
//!
//! The sources are the external REST stores; implementations live with the
//! caller. [`AvailabilityService`] is the thin adapter every booking surface
//! can share: it fetches snapshots, runs [`resolve_day`] and keeps the result
//! in a [`SlotCache`] until it goes stale or a mutation invalidates it.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::cache::SlotCache;
use crate::config::EngineConfig;
use crate::error::{AvailabilityError, Result};
use crate::occupancy::Appointment;
use crate::rule::AvailabilityRule;
use crate::schedule::{bookable_dates, resolve_day, DaySchedule};

/// Where a professional's availability rules live.
pub trait RuleSource {
    fn fetch_rules(&self, professional_id: &str) -> Result<Vec<AvailabilityRule>>;

    /// Replace the professional's whole rule set.
    fn save_rules(&mut self, professional_id: &str, rules: &[AvailabilityRule]) -> Result<()>;

    /// Store one rule and return it with its assigned id.
    fn add_rule(&mut self, professional_id: &str, rule: AvailabilityRule) -> Result<AvailabilityRule>;

    fn delete_rule(&mut self, rule_id: &str) -> Result<()>;
}

/// Where booked appointments live.
pub trait AppointmentSource {
    fn fetch_appointments(&self, professional_id: &str, date: NaiveDate) -> Result<Vec<Appointment>>;
}

/// Cached, source-backed slot resolution for any number of professionals.
pub struct AvailabilityService<R, A> {
    rules: R,
    appointments: A,
    cache: SlotCache,
    config: EngineConfig,
}

impl<R: RuleSource, A: AppointmentSource> AvailabilityService<R, A> {
    pub fn new(rules: R, appointments: A, config: EngineConfig) -> Self {
        Self {
            rules,
            appointments,
            cache: SlotCache::new(config.cache_ttl()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &SlotCache {
        &self.cache
    }

    pub fn rule_source(&self) -> &R {
        &self.rules
    }

    pub fn appointment_source(&self) -> &A {
        &self.appointments
    }

    /// The schedule for `date`, from cache while fresh, otherwise recomputed
    /// from fresh source snapshots.
    ///
    /// # Errors
    /// Source failures are returned unchanged; nothing is cached for them.
    pub fn slots_for(&mut self, professional_id: &str, date: NaiveDate, now: Instant) -> Result<DaySchedule> {
        if let Some(schedule) = self.cache.get(professional_id, date, now) {
            debug!(professional_id, %date, "serving cached schedule");
            return Ok(schedule.clone());
        }

        let rules = self.rules.fetch_rules(professional_id)?;
        let appointments = self.appointments.fetch_appointments(professional_id, date)?;
        let schedule = resolve_day(
            &rules,
            date,
            appointments.iter().filter(|appt| appt.date() == date),
            self.config.occupancy_policy,
        );

        let evicted = self.cache.purge_stale(now);
        if evicted > 0 {
            debug!(evicted, "purged stale schedules");
        }
        self.cache.insert(professional_id, schedule.clone(), now);
        Ok(schedule)
    }

    /// Dates within the configured horizon after `today` that have availability.
    pub fn bookable_dates(&self, professional_id: &str, today: NaiveDate) -> Result<Vec<NaiveDate>> {
        let rules = self.rules.fetch_rules(professional_id)?;
        Ok(bookable_dates(&rules, today, self.config.booking_horizon_days))
    }

    /// Call after any successful booking mutation (create, status change,
    /// cancel) and after a conflict response from the booking endpoint.
    pub fn record_booking(&mut self, professional_id: &str, date: NaiveDate) {
        self.cache.invalidate(professional_id, date);
    }

    /// Validate and store a full rule set.
    ///
    /// # Errors
    /// Returns the first validation error without touching the source.
    pub fn replace_rules(&mut self, professional_id: &str, rules: &[AvailabilityRule]) -> Result<()> {
        for rule in rules {
            if let Err(e) = rule.validate() {
                warn!(professional_id, error = %e, "rejecting malformed rule set");
                return Err(e);
            }
        }
        self.rules.save_rules(professional_id, rules)?;
        self.cache.invalidate_professional(professional_id);
        Ok(())
    }

    pub fn add_rule(&mut self, professional_id: &str, rule: AvailabilityRule) -> Result<AvailabilityRule> {
        rule.validate()?;
        let saved = self.rules.add_rule(professional_id, rule)?;
        self.cache.invalidate_professional(professional_id);
        Ok(saved)
    }

    pub fn delete_rule(&mut self, professional_id: &str, rule_id: &str) -> Result<()> {
        if rule_id.is_empty() {
            return Err(AvailabilityError::InvalidRule {
                rule_id: None,
                reason: "cannot delete a rule without an id".to_string(),
            });
        }
        self.rules.delete_rule(rule_id)?;
        self.cache.invalidate_professional(professional_id);
        Ok(())
    }
}
