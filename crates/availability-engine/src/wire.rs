//! Wire representations exchanged with the rule and appointment stores.
//!
//! Rules travel as `{ dayOfWeek, specificDate, startTime: "HH:mm:ss",
//! endTime, slotDurationMinutes, active }` with exactly one of `dayOfWeek` /
//! `specificDate` set. Appointments carry an ISO-8601 `startDateTime`.
//! Conversion into the domain types happens here and nowhere else.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::calendar::{date_key, parse_date_key};
use crate::error::{AvailabilityError, Result};
use crate::occupancy::Appointment;
use crate::rule::{AvailabilityRule, RuleScope, SlotTime};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Identifier as the REST backend sends it: a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

/// Ids that are canonical integers go back out as numbers, so rows read
/// from the store serialize in the shape they arrived in.
impl From<String> for WireId {
    fn from(id: String) -> Self {
        match id.parse::<i64>() {
            Ok(n) if n.to_string() == id => WireId::Number(n),
            _ => WireId::Text(id),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A rule as stored by the rule source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub specific_date: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub slot_duration_minutes: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Blank strings count as absent; the authoring forms submit `""` for the
/// scope field that does not apply.
fn non_blank(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

impl TryFrom<RuleDto> for AvailabilityRule {
    type Error = AvailabilityError;

    fn try_from(dto: RuleDto) -> Result<Self> {
        let scope = match (non_blank(dto.day_of_week), non_blank(dto.specific_date)) {
            (Some(day), None) => RuleScope::Weekly(day.parse()?),
            (None, Some(date)) => RuleScope::SpecificDate(parse_date_key(&date)?),
            (Some(day), Some(date)) => {
                return Err(AvailabilityError::AmbiguousScope(format!(
                    "dayOfWeek={} specificDate={}",
                    day, date
                )))
            }
            (None, None) => {
                return Err(AvailabilityError::AmbiguousScope(
                    "neither field set".to_string(),
                ))
            }
        };

        Ok(AvailabilityRule {
            id: dto.id.map(String::from),
            scope,
            start_time: dto.start_time.parse()?,
            end_time: dto.end_time.parse()?,
            slot_duration_minutes: dto.slot_duration_minutes,
            active: dto.active,
        })
    }
}

impl From<AvailabilityRule> for RuleDto {
    fn from(rule: AvailabilityRule) -> Self {
        let (day_of_week, specific_date) = match rule.scope {
            RuleScope::Weekly(day) => (Some(day.as_str().to_string()), None),
            RuleScope::SpecificDate(date) => (None, Some(date_key(date))),
        };
        RuleDto {
            id: rule.id.map(WireId::from),
            day_of_week,
            specific_date,
            start_time: rule.start_time.to_wire(),
            end_time: rule.end_time.to_wire(),
            slot_duration_minutes: rule.slot_duration_minutes,
            active: rule.active,
        }
    }
}

/// Nested `professional: { id }` object some endpoints return instead of a
/// flat `professionalId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalRef {
    pub id: WireId,
}

/// An appointment as returned by the appointment source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional: Option<ProfessionalRef>,
    pub start_date_time: String,
    pub status: String,
    #[serde(default)]
    pub patient: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TryFrom<AppointmentDto> for Appointment {
    type Error = AvailabilityError;

    fn try_from(dto: AppointmentDto) -> Result<Self> {
        let professional_id = dto
            .professional_id
            .or(dto.professional.map(|p| p.id))
            .map(String::from);

        Ok(Appointment {
            id: dto.id.map(String::from),
            professional_id,
            start_date_time: parse_date_time(&dto.start_date_time)?,
            status: dto.status.parse()?,
            patient: dto.patient,
            notes: dto.notes,
        })
    }
}

impl From<Appointment> for AppointmentDto {
    fn from(appointment: Appointment) -> Self {
        AppointmentDto {
            id: appointment.id.map(WireId::from),
            professional_id: appointment.professional_id.map(WireId::from),
            professional: None,
            start_date_time: appointment.start_date_time.format(DATE_TIME_FORMAT).to_string(),
            status: appointment.status.as_str().to_string(),
            patient: appointment.patient,
            notes: appointment.notes,
        }
    }
}

/// Parse an ISO-8601 date-time into its wall-clock fields.
///
/// Accepts `yyyy-MM-ddTHH:mm[:ss[.fff]]` and RFC 3339 strings with an
/// offset. An offset is not applied: `2024-02-12T09:30:00Z` and
/// `2024-02-12T09:30:00-03:00` both read as 09:30 on 2024-02-12.
///
/// # Errors
/// Returns `AvailabilityError::InvalidDate` when no accepted shape matches.
pub fn parse_date_time(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| AvailabilityError::InvalidDate(s.to_string()))
}

fn serialize_date_time<S: Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format(DATE_TIME_FORMAT).to_string())
}

/// Payload for the booking-creation endpoint, composed from a chosen slot.
///
/// The engine does not submit it. Uniqueness of a booking per slot is the
/// endpoint's job; on a conflict response the caller invalidates its cached
/// schedule and recomputes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub professional_id: String,
    #[serde(serialize_with = "serialize_date_time")]
    pub start_date_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub patient: Value,
}

impl BookingRequest {
    pub fn new(
        professional_id: impl Into<String>,
        date: NaiveDate,
        slot: SlotTime,
        patient: Value,
    ) -> Self {
        Self {
            professional_id: professional_id.into(),
            start_date_time: date.and_time(NaiveTime::from(slot)),
            notes: None,
            patient,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Parse a JSON array of wire rules.
pub fn rules_from_json(json: &str) -> Result<Vec<AvailabilityRule>> {
    let dtos: Vec<RuleDto> = serde_json::from_str(json)?;
    dtos.into_iter().map(AvailabilityRule::try_from).collect()
}

/// Parse a JSON array of wire appointments.
pub fn appointments_from_json(json: &str) -> Result<Vec<Appointment>> {
    let dtos: Vec<AppointmentDto> = serde_json::from_str(json)?;
    dtos.into_iter().map(Appointment::try_from).collect()
}
