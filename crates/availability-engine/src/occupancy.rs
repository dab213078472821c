//! Occupancy reconciliation -- mark expanded slots taken by booked appointments.
//!
//! A slot is occupied iff an occupying appointment starts at exactly the same
//! `HH:mm`. There is no duration or overlap check: an appointment whose start
//! does not land on a generated slot boundary (for example after the rule was
//! edited) does not mark any slot.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AvailabilityError, Result};
use crate::rule::SlotTime;
use crate::wire::AppointmentDto;

/// Lifecycle status of a booked appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Upper-case name as the backend spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AvailabilityError;

    /// Accepts the backend names and the Spanish display labels some
    /// endpoints echo back (`"Confirmado"`).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "PENDIENTE" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" | "CONFIRMADO" => Ok(AppointmentStatus::Confirmed),
            "CANCELLED" | "CANCELED" | "CANCELADO" => Ok(AppointmentStatus::Cancelled),
            "COMPLETED" | "COMPLETADO" => Ok(AppointmentStatus::Completed),
            _ => Err(AvailabilityError::InvalidStatus(s.to_string())),
        }
    }
}

/// Which appointment statuses hold a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OccupancyPolicy {
    /// Everything except `CANCELLED` occupies; a pending booking holds its
    /// slot until it is cancelled.
    #[default]
    ExcludeCancelled,
    /// Only `CONFIRMED` occupies.
    ConfirmedOnly,
}

impl OccupancyPolicy {
    pub fn occupies(self, status: AppointmentStatus) -> bool {
        match self {
            OccupancyPolicy::ExcludeCancelled => status != AppointmentStatus::Cancelled,
            OccupancyPolicy::ConfirmedOnly => status == AppointmentStatus::Confirmed,
        }
    }
}

impl FromStr for OccupancyPolicy {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "excludecancelled" => Ok(OccupancyPolicy::ExcludeCancelled),
            "confirmedonly" => Ok(OccupancyPolicy::ConfirmedOnly),
            _ => Err(AvailabilityError::InvalidConfig(format!(
                "unknown occupancy policy '{}'",
                s
            ))),
        }
    }
}

/// A booked appointment, read-only from the engine's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AppointmentDto", into = "AppointmentDto")]
pub struct Appointment {
    pub id: Option<String>,
    pub professional_id: Option<String>,
    /// Wall-clock start, naive.
    pub start_date_time: NaiveDateTime,
    pub status: AppointmentStatus,
    /// Opaque patient payload, passed through untouched.
    pub patient: Value,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn new(start_date_time: NaiveDateTime, status: AppointmentStatus) -> Self {
        Self {
            id: None,
            professional_id: None,
            start_date_time,
            status,
            patient: Value::Null,
            notes: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_professional(mut self, professional_id: impl Into<String>) -> Self {
        self.professional_id = Some(professional_id.into());
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.start_date_time.date()
    }

    /// Start time at minute granularity; seconds are discarded.
    pub fn start_slot(&self) -> SlotTime {
        self.start_date_time.time().into()
    }
}

/// One bookable slot as handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSlot {
    pub time: SlotTime,
    pub is_available: bool,
    pub occupying_appointment: Option<Appointment>,
}

/// Appointments for one professional on one calendar date.
///
/// Appointments that carry no professional id are dropped.
pub fn appointments_on<'a>(
    appointments: &'a [Appointment],
    professional_id: &'a str,
    date: NaiveDate,
) -> impl Iterator<Item = &'a Appointment> + 'a {
    appointments.iter().filter(move |appt| {
        appt.professional_id.as_deref() == Some(professional_id) && appt.date() == date
    })
}

/// Mark each slot as available or occupied.
///
/// `appointments` must already be narrowed to the professional and date
/// being resolved (see [`appointments_on`]). Appointments whose status the
/// `policy` does not count are ignored. When two occupying appointments share
/// a start time, the first in input order is reported.
pub fn reconcile<'a, I>(
    slots: &[SlotTime],
    appointments: I,
    policy: OccupancyPolicy,
) -> Vec<ResolvedSlot>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let mut booked: HashMap<SlotTime, &Appointment> = HashMap::new();
    for appt in appointments {
        if policy.occupies(appt.status) {
            booked.entry(appt.start_slot()).or_insert(appt);
        }
    }

    slots
        .iter()
        .map(|&time| {
            let occupying = booked.get(&time).map(|appt| (*appt).clone());
            ResolvedSlot {
                time,
                is_available: occupying.is_none(),
                occupying_appointment: occupying,
            }
        })
        .collect()
}
