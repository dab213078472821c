//! Tests for the REST wire formats.

use availability_engine::occupancy::{Appointment, AppointmentStatus};
use availability_engine::rule::{AvailabilityRule, RuleScope, SlotTime};
use availability_engine::wire::{
    appointments_from_json, parse_date_time, rules_from_json, BookingRequest, RuleDto,
};
use availability_engine::{AvailabilityError, DayOfWeek};
use chrono::NaiveDate;
use serde_json::{json, Value};

fn t(s: &str) -> SlotTime {
    s.parse().unwrap()
}

// ── Rules ───────────────────────────────────────────────────────────────────

#[test]
fn weekly_rule_round_trips_through_the_wire_format() {
    let rule = AvailabilityRule::weekly(DayOfWeek::Monday, t("08:00"), t("12:00"), 30);

    let wire = serde_json::to_value(&rule).unwrap();
    assert_eq!(wire["dayOfWeek"], json!("MONDAY"));
    assert_eq!(wire["specificDate"], Value::Null);
    assert_eq!(wire["startTime"], json!("08:00:00"));
    assert_eq!(wire["endTime"], json!("12:00:00"));
    assert_eq!(wire["slotDurationMinutes"], json!(30));
    assert_eq!(wire["active"], json!(true));

    let back: AvailabilityRule = serde_json::from_value(wire).unwrap();
    assert_eq!(back.scope, RuleScope::Weekly(DayOfWeek::Monday));
    assert_eq!(back, rule);
}

#[test]
fn specific_rule_round_trips_with_null_day_of_week() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let rule = AvailabilityRule::specific(date, t("14:00"), t("16:00"), 60).with_id("9");

    let wire = serde_json::to_value(&rule).unwrap();
    assert_eq!(wire["dayOfWeek"], Value::Null);
    assert_eq!(wire["specificDate"], json!("2024-03-04"));
    assert_eq!(wire["id"], json!(9));

    let back: AvailabilityRule = serde_json::from_value(wire).unwrap();
    assert_eq!(back, rule);
}

#[test]
fn backend_rules_parse_with_numeric_ids_and_seconds() {
    let json = r#"[
        {"id": 1, "dayOfWeek": "MONDAY", "specificDate": null,
         "startTime": "08:00:00", "endTime": "12:00:30", "slotDurationMinutes": 30, "active": true},
        {"id": 2, "dayOfWeek": null, "specificDate": "2024-03-04",
         "startTime": "14:00:00", "endTime": "16:00:00", "slotDurationMinutes": 60, "active": false}
    ]"#;
    let rules = rules_from_json(json).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].id.as_deref(), Some("1"));
    assert_eq!(rules[0].end_time, t("12:00"));
    assert!(!rules[1].active);
    assert_eq!(
        rules[1].scope,
        RuleScope::SpecificDate(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    );
}

#[test]
fn missing_active_flag_defaults_to_active_and_blank_scope_counts_as_absent() {
    let dto: RuleDto = serde_json::from_value(json!({
        "dayOfWeek": "FRIDAY",
        "specificDate": "",
        "startTime": "09:00",
        "endTime": "10:00",
        "slotDurationMinutes": 15
    }))
    .unwrap();
    let rule = AvailabilityRule::try_from(dto).unwrap();
    assert!(rule.active);
    assert_eq!(rule.scope, RuleScope::Weekly(DayOfWeek::Friday));
}

#[test]
fn both_scope_fields_set_is_rejected() {
    let result: Result<AvailabilityRule, _> = serde_json::from_value(json!({
        "dayOfWeek": "MONDAY",
        "specificDate": "2024-03-04",
        "startTime": "08:00:00",
        "endTime": "12:00:00",
        "slotDurationMinutes": 30,
        "active": true
    }));
    assert!(result.is_err());

    let dto: RuleDto = serde_json::from_value(json!({
        "dayOfWeek": "MONDAY",
        "specificDate": "2024-03-04",
        "startTime": "08:00:00",
        "endTime": "12:00:00",
        "slotDurationMinutes": 30
    }))
    .unwrap();
    assert!(matches!(
        AvailabilityRule::try_from(dto),
        Err(AvailabilityError::AmbiguousScope(_))
    ));
}

#[test]
fn neither_scope_field_set_is_rejected() {
    let dto: RuleDto = serde_json::from_value(json!({
        "dayOfWeek": null,
        "specificDate": null,
        "startTime": "08:00:00",
        "endTime": "12:00:00",
        "slotDurationMinutes": 30
    }))
    .unwrap();
    assert!(matches!(
        AvailabilityRule::try_from(dto),
        Err(AvailabilityError::AmbiguousScope(_))
    ));
}

#[test]
fn bad_day_or_time_is_reported() {
    let bad_day = r#"[{"dayOfWeek": "FUNDAY", "startTime": "08:00", "endTime": "09:00", "slotDurationMinutes": 30}]"#;
    assert!(matches!(
        rules_from_json(bad_day),
        Err(AvailabilityError::InvalidDayOfWeek(_))
    ));
    let bad_time = r#"[{"dayOfWeek": "MONDAY", "startTime": "8am", "endTime": "09:00", "slotDurationMinutes": 30}]"#;
    assert!(matches!(
        rules_from_json(bad_time),
        Err(AvailabilityError::InvalidTime(_))
    ));
    assert!(matches!(rules_from_json("{"), Err(AvailabilityError::Json(_))));
}

// ── Appointments ────────────────────────────────────────────────────────────

#[test]
fn appointments_parse_flat_and_nested_professional_ids() {
    let json = r#"[
        {"id": 10, "professionalId": 3, "startDateTime": "2024-02-12T09:30:00",
         "status": "CONFIRMED", "patient": {"fullName": "Ana Pérez"}},
        {"id": "11", "professional": {"id": 3}, "startDateTime": "2024-02-12T10:00",
         "status": "PENDING", "patient": {}, "whatsappSent": true}
    ]"#;
    let appts = appointments_from_json(json).unwrap();
    assert_eq!(appts.len(), 2);
    assert_eq!(appts[0].professional_id.as_deref(), Some("3"));
    assert_eq!(appts[1].professional_id.as_deref(), Some("3"));
    assert_eq!(appts[0].start_slot(), t("09:30"));
    assert_eq!(appts[1].status, AppointmentStatus::Pending);
    assert_eq!(appts[0].patient["fullName"], json!("Ana Pérez"));
}

#[test]
fn unknown_status_is_rejected() {
    let json = r#"[{"startDateTime": "2024-02-12T09:30:00", "status": "NO_SHOW"}]"#;
    assert!(matches!(
        appointments_from_json(json),
        Err(AvailabilityError::InvalidStatus(_))
    ));
}

#[test]
fn offsets_are_not_applied_to_wall_clock_time() {
    let utc = parse_date_time("2024-02-12T09:30:00Z").unwrap();
    let local = parse_date_time("2024-02-12T09:30:00-03:00").unwrap();
    let naive = parse_date_time("2024-02-12T09:30:00.000").unwrap();
    assert_eq!(utc, naive);
    assert_eq!(local, naive);
    assert!(parse_date_time("12/02/2024 09:30").is_err());
}

#[test]
fn appointment_serializes_back_to_wire_shape() {
    let appt = Appointment::new(parse_date_time("2024-02-12T09:30:00").unwrap(), AppointmentStatus::Completed)
        .with_id("5")
        .with_professional("3");
    let wire = serde_json::to_value(&appt).unwrap();
    assert_eq!(wire["startDateTime"], json!("2024-02-12T09:30:00"));
    assert_eq!(wire["status"], json!("COMPLETED"));
    assert_eq!(wire["professionalId"], json!(3));
    assert_eq!(wire["id"], json!(5));
}

#[test]
fn store_ids_keep_their_json_type() {
    let json = r#"[
        {"id": 1, "dayOfWeek": "MONDAY", "startTime": "08:00:00", "endTime": "12:00:00",
         "slotDurationMinutes": 30},
        {"id": "r-1", "dayOfWeek": "TUESDAY", "startTime": "08:00:00", "endTime": "12:00:00",
         "slotDurationMinutes": 30},
        {"id": "007", "dayOfWeek": "FRIDAY", "startTime": "08:00:00", "endTime": "12:00:00",
         "slotDurationMinutes": 30}
    ]"#;
    let rules = rules_from_json(json).unwrap();
    let wire = serde_json::to_value(&rules).unwrap();
    assert_eq!(wire[0]["id"], json!(1));
    assert_eq!(wire[1]["id"], json!("r-1"));
    assert_eq!(wire[2]["id"], json!("007"));
}

#[test]
fn unpadded_specific_date_is_rejected() {
    let json = r#"[{"dayOfWeek": null, "specificDate": "2024-3-4",
        "startTime": "14:00:00", "endTime": "16:00:00", "slotDurationMinutes": 60}]"#;
    assert!(matches!(rules_from_json(json), Err(AvailabilityError::InvalidDate(_))));
}

// ── Booking payload ─────────────────────────────────────────────────────────

#[test]
fn booking_request_uses_naive_wall_clock_start() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let request = BookingRequest::new("3", date, t("14:00"), json!({"firstName": "Ana"}))
        .with_notes("Reserva web");
    let wire = serde_json::to_value(&request).unwrap();
    assert_eq!(
        wire,
        json!({
            "professionalId": "3",
            "startDateTime": "2024-03-04T14:00:00",
            "notes": "Reserva web",
            "patient": {"firstName": "Ana"}
        })
    );
}

#[test]
fn booking_request_omits_absent_notes() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let wire = serde_json::to_value(BookingRequest::new("3", date, t("09:00"), json!({}))).unwrap();
    assert!(wire.get("notes").is_none());
}
