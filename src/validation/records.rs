//! Building records from request bodies.

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::{Appointment, AppointmentUpdate, Patient};

use super::Fields;

const PATIENT_REQUIRED: [&str; 4] = ["first_name", "last_name", "birth_date", "phone"];
const APPOINTMENT_REQUIRED: [&str; 4] = [
    "patient_id",
    "doctor_name",
    "appointment_date",
    "appointment_time",
];

const DEFAULT_DURATION_MINUTES: u32 = 30;
const DEFAULT_APPOINTMENT_TYPE: &str = "consultation";
const DEFAULT_APPOINTMENT_STATUS: &str = "scheduled";

/// Build a new patient from a creation body.
pub fn new_patient(fields: &Fields) -> Result<Patient, ApiError> {
    fields.require_present(&PATIENT_REQUIRED)?;

    Ok(Patient {
        id: generate_id("pat"),
        first_name: fields.get_string("first_name")?,
        last_name: fields.get_string("last_name")?,
        birth_date: fields.get_string("birth_date")?,
        phone: fields.get_string("phone")?,
        email: fields.get_optional_string("email")?.unwrap_or_default(),
        address: fields.get_optional_string("address")?.unwrap_or_default(),
        created_at: now_iso(),
    })
}

/// Build a new appointment from a creation body.
///
/// Does not check that the patient exists; the caller owns the store.
pub fn new_appointment(fields: &Fields) -> Result<Appointment, ApiError> {
    fields.require_present(&APPOINTMENT_REQUIRED)?;

    Ok(Appointment {
        id: generate_id("apt"),
        patient_id: fields.get_string("patient_id")?,
        doctor_name: fields.get_string("doctor_name")?,
        appointment_date: fields.get_string("appointment_date")?,
        appointment_time: fields.get_string("appointment_time")?,
        duration_minutes: fields
            .get_optional_u32("duration_minutes")?
            .unwrap_or(DEFAULT_DURATION_MINUTES),
        kind: fields
            .get_optional_string("type")?
            .unwrap_or_else(|| DEFAULT_APPOINTMENT_TYPE.to_string()),
        status: fields
            .get_optional_string("status")?
            .unwrap_or_else(|| DEFAULT_APPOINTMENT_STATUS.to_string()),
        notes: fields.get_optional_string("notes")?.unwrap_or_default(),
        created_at: now_iso(),
    })
}

/// Collect the updatable appointment fields. Unknown keys are ignored.
pub fn appointment_update(fields: &Fields) -> Result<AppointmentUpdate, ApiError> {
    Ok(AppointmentUpdate {
        doctor_name: fields.get_optional_string("doctor_name")?,
        appointment_date: fields.get_optional_string("appointment_date")?,
        appointment_time: fields.get_optional_string("appointment_time")?,
        duration_minutes: fields.get_optional_u32("duration_minutes")?,
        kind: fields.get_optional_string("type")?,
        status: fields.get_optional_string("status")?,
        notes: fields.get_optional_string("notes")?,
    })
}

/// `{prefix}_` followed by eight hex characters.
fn generate_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..8])
}

/// Current UTC time, RFC 3339 with microseconds and a `Z` suffix.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
