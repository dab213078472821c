//! # availability-engine
//!
//! Deterministic availability-to-slot resolution for appointment booking.
//!
//! Given a professional's weekly and date-specific availability rules, a
//! calendar date and the appointments already booked that day, the engine
//! produces the ordered list of slots a booking UI renders as available or
//! occupied. All functions are pure and synchronous; fetching rules and
//! appointments, and enforcing one booking per slot, belong to the caller and
//! the booking endpoint.
//!
//! ## Quick start
//!
//! ```rust
//! use availability_engine::{resolve_day, AvailabilityRule, DayOfWeek, OccupancyPolicy};
//! use chrono::NaiveDate;
//!
//! let rules = vec![AvailabilityRule::weekly(
//!     DayOfWeek::Monday,
//!     "08:00".parse().unwrap(),
//!     "09:00".parse().unwrap(),
//!     30,
//! )];
//! let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
//! let day = resolve_day(&rules, monday, std::iter::empty(), OccupancyPolicy::default());
//! let times: Vec<String> = day.slots.iter().map(|s| s.time.to_string()).collect();
//! assert_eq!(times, ["08:00", "08:30"]);
//! ```
//!
//! ## Modules
//!
//! - [`calendar`]: weekday and `yyyy-MM-dd` date-key utilities
//! - [`rule`]: rule model, minute-granular times, validation
//! - [`resolver`]: specific-date override precedence
//! - [`expander`]: rule window → slot start times
//! - [`occupancy`]: appointments, status policy, slot reconciliation
//! - [`schedule`]: per-day composition, bookable dates, rule grouping
//! - [`wire`]: REST wire formats and booking payloads
//! - [`cache`]: staleness-windowed cache of day schedules
//! - [`source`]: rule/appointment source traits and the cached service
//! - [`config`]: engine configuration
//! - [`error`]: error types

pub mod cache;
pub mod calendar;
pub mod config;
pub mod error;
pub mod expander;
pub mod occupancy;
pub mod resolver;
pub mod rule;
pub mod schedule;
pub mod source;
pub mod wire;

pub use cache::SlotCache;
pub use calendar::{date_key, day_of_week, parse_date_key, DayOfWeek};
pub use config::EngineConfig;
pub use error::AvailabilityError;
pub use expander::{expand_rule, expand_rules, expand_window, SlotIter};
pub use occupancy::{
    appointments_on, reconcile, Appointment, AppointmentStatus, OccupancyPolicy, ResolvedSlot,
};
pub use resolver::{has_availability, resolve_rules};
pub use rule::{validate_rules, AvailabilityRule, RuleScope, SlotTime};
pub use schedule::{
    bookable_dates, group_rules, resolve_day, slots_for_date, DaySchedule, RuleGroups,
};
pub use source::{AppointmentSource, AvailabilityService, RuleSource};
pub use wire::{appointments_from_json, rules_from_json, BookingRequest};
