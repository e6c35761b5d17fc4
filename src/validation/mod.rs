//! Request body validation.
//!
//! Turns raw JSON bodies into typed records, reporting the first missing or
//! mistyped field.

mod fields;
mod records;

pub use fields::Fields;
pub use records::{appointment_update, new_appointment, new_patient, now_iso};
