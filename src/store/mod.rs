//! Record storage.
//!
//! A process-local store of patients and appointments. Nothing is
//! persisted; restarting the service restores the seed data.

mod memory;
mod types;

pub use memory::{Collection, MemoryStore};
pub use types::{Appointment, AppointmentUpdate, Patient, Record};
