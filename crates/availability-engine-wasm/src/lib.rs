//! WASM bindings for availability-engine.
//!
//! Exposes day resolution, bookable-date search and rule grouping to the
//! booking UI via `wasm-bindgen`. Rules and appointments cross the boundary
//! as JSON strings in the REST wire format, so the UI can pass API responses
//! through unchanged.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/availability-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_engine_wasm.wasm
//! ```

use availability_engine::{
    appointments_from_json, bookable_dates, date_key, day_of_week, group_rules, has_availability,
    parse_date_key, resolve_day, rules_from_json, slots_for_date, AvailabilityError,
    BookingRequest, OccupancyPolicy, SlotTime,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

type Result<T> = std::result::Result<T, AvailabilityError>;

// ---------------------------------------------------------------------------
// DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleProblemDto {
    index: usize,
    message: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_js(e: AvailabilityError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn parse_policy(policy: Option<&str>) -> Result<OccupancyPolicy> {
    match policy {
        Some(p) if !p.trim().is_empty() => p.parse(),
        _ => Ok(OccupancyPolicy::default()),
    }
}

fn date_strings(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().map(|d| date_key(*d)).collect()
}

// ---------------------------------------------------------------------------
// Native implementations, wrapped by the exports below
// ---------------------------------------------------------------------------

fn resolve_day_json(
    rules_json: &str,
    date: &str,
    appointments_json: &str,
    policy: Option<&str>,
) -> Result<String> {
    let rules = rules_from_json(rules_json)?;
    let date = parse_date_key(date)?;
    let appointments = appointments_from_json(appointments_json)?;
    let schedule = resolve_day(
        &rules,
        date,
        appointments.iter().filter(|a| a.date() == date),
        parse_policy(policy)?,
    );
    to_json(&schedule)
}

fn slots_for_date_json(rules_json: &str, date: &str) -> Result<String> {
    let rules = rules_from_json(rules_json)?;
    let slots = slots_for_date(&rules, parse_date_key(date)?);
    to_json(&slots)
}

fn has_availability_json(rules_json: &str, date: &str) -> Result<bool> {
    let rules = rules_from_json(rules_json)?;
    Ok(has_availability(&rules, parse_date_key(date)?))
}

fn bookable_dates_json(rules_json: &str, today: &str, horizon_days: u32) -> Result<String> {
    let rules = rules_from_json(rules_json)?;
    let dates = bookable_dates(&rules, parse_date_key(today)?, horizon_days);
    to_json(&date_strings(&dates))
}

fn group_rules_json(rules_json: &str) -> Result<String> {
    let rules = rules_from_json(rules_json)?;
    to_json(&group_rules(&rules))
}

fn validate_rules_json(rules_json: &str) -> Result<String> {
    let rules = rules_from_json(rules_json)?;
    let problems: Vec<RuleProblemDto> = rules
        .iter()
        .enumerate()
        .filter_map(|(index, rule)| {
            rule.validate().err().map(|e| RuleProblemDto {
                index,
                message: e.to_string(),
            })
        })
        .collect();
    to_json(&problems)
}

fn booking_request_json(
    professional_id: &str,
    date: &str,
    time: &str,
    patient_json: &str,
    notes: Option<String>,
) -> Result<String> {
    let slot: SlotTime = time.parse()?;
    let patient: Value = serde_json::from_str(patient_json)?;
    let mut request = BookingRequest::new(professional_id, parse_date_key(date)?, slot, patient);
    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        request = request.with_notes(notes);
    }
    to_json(&request)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Resolve one date into a day schedule.
///
/// `rules_json` and `appointments_json` are arrays in the REST wire format;
/// appointments on other dates are ignored. `policy` is `"excludeCancelled"`
/// (default) or `"confirmedOnly"`. Returns the schedule as JSON with
/// `{date, dayOfWeek, rules, slots: [{time, isAvailable, occupyingAppointment}]}`.
#[wasm_bindgen(js_name = "resolveDay")]
pub fn resolve_day_js(
    rules_json: &str,
    date: &str,
    appointments_json: &str,
    policy: Option<String>,
) -> std::result::Result<String, JsValue> {
    resolve_day_json(rules_json, date, appointments_json, policy.as_deref()).map_err(to_js)
}

/// Candidate slot start times (`"HH:mm"`) for a date, ignoring bookings.
#[wasm_bindgen(js_name = "slotsForDate")]
pub fn slots_for_date_js(rules_json: &str, date: &str) -> std::result::Result<String, JsValue> {
    slots_for_date_json(rules_json, date).map_err(to_js)
}

/// Whether any active rule governs the date.
#[wasm_bindgen(js_name = "hasAvailability")]
pub fn has_availability_js(rules_json: &str, date: &str) -> std::result::Result<bool, JsValue> {
    has_availability_json(rules_json, date).map_err(to_js)
}

/// Dates after `today` (exclusive) within `horizon_days` that have availability.
#[wasm_bindgen(js_name = "bookableDates")]
pub fn bookable_dates_js(
    rules_json: &str,
    today: &str,
    horizon_days: u32,
) -> std::result::Result<String, JsValue> {
    bookable_dates_json(rules_json, today, horizon_days).map_err(to_js)
}

/// Rules grouped by weekday and by specific date, each group sorted by start time.
#[wasm_bindgen(js_name = "groupRules")]
pub fn group_rules_js(rules_json: &str) -> std::result::Result<String, JsValue> {
    group_rules_json(rules_json).map_err(to_js)
}

/// Validation problems as `[{index, message}]`; empty when all rules are well formed.
#[wasm_bindgen(js_name = "validateRules")]
pub fn validate_rules_js(rules_json: &str) -> std::result::Result<String, JsValue> {
    validate_rules_json(rules_json).map_err(to_js)
}

/// Build the create-appointment payload for a chosen slot.
#[wasm_bindgen(js_name = "bookingRequest")]
pub fn booking_request_js(
    professional_id: &str,
    date: &str,
    time: &str,
    patient_json: &str,
    notes: Option<String>,
) -> std::result::Result<String, JsValue> {
    booking_request_json(professional_id, date, time, patient_json, notes).map_err(to_js)
}

/// Day-of-week number (Sunday = 0) for a `yyyy-MM-dd` date.
#[wasm_bindgen(js_name = "dayOfWeek")]
pub fn day_of_week_js(date: &str) -> std::result::Result<u8, JsValue> {
    parse_date_key(date)
        .map(|d| day_of_week(d).number())
        .map_err(to_js)
}
