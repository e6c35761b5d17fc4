//! In-memory record collections.

use std::sync::RwLock;

use tracing::debug;

use super::types::{Appointment, Patient, Record};

/// Insertion-ordered records keyed by id.
///
/// Readers get clones; the lock is never held across an await point.
pub struct Collection<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(seed: Vec<T>) -> Self {
        Self {
            records: RwLock::new(seed),
        }
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<T> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Records matching a predicate, in insertion order.
    pub fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|r| r.id() == id)
    }

    /// Append a record.
    pub fn insert(&self, record: T) {
        debug!(id = record.id(), "Inserting record");
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }

    /// Modify a record in place, returning the updated copy.
    pub fn update<F>(&self, id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let record = records.iter_mut().find(|r| r.id() == id)?;
        f(record);
        Some(record.clone())
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Patients and appointments held for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    pub patients: Collection<Patient>,
    pub appointments: Collection<Appointment>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the demo patients and appointments.
    pub fn seeded() -> Self {
        Self {
            patients: Collection::new(seed_patients()),
            appointments: Collection::new(seed_appointments()),
        }
    }
}

fn seed_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "pat_001".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            birth_date: "1985-03-15".to_string(),
            phone: "+33123456789".to_string(),
            email: "jean.dupont@email.com".to_string(),
            address: "123 Rue de la Santé, 75014 Paris".to_string(),
            created_at: "2024-01-15T10:30:00Z".to_string(),
        },
        Patient {
            id: "pat_002".to_string(),
            first_name: "Marie".to_string(),
            last_name: "Martin".to_string(),
            birth_date: "1992-07-22".to_string(),
            phone: "+33987654321".to_string(),
            email: "marie.martin@email.com".to_string(),
            address: "456 Avenue des Médecins, 69001 Lyon".to_string(),
            created_at: "2024-01-20T14:15:00Z".to_string(),
        },
    ]
}

fn seed_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: "apt_001".to_string(),
            patient_id: "pat_001".to_string(),
            doctor_name: "Dr. Leblanc".to_string(),
            appointment_date: "2024-03-20".to_string(),
            appointment_time: "14:30".to_string(),
            duration_minutes: 30,
            kind: "consultation".to_string(),
            status: "scheduled".to_string(),
            notes: "Consultation de routine".to_string(),
            created_at: "2024-01-15T11:00:00Z".to_string(),
        },
        Appointment {
            id: "apt_002".to_string(),
            patient_id: "pat_002".to_string(),
            doctor_name: "Dr. Rousseau".to_string(),
            appointment_date: "2024-03-25".to_string(),
            appointment_time: "09:15".to_string(),
            duration_minutes: 45,
            kind: "specialist".to_string(),
            status: "confirmed".to_string(),
            notes: "Consultation spécialisée cardiologie".to_string(),
            created_at: "2024-01-20T15:30:00Z".to_string(),
        },
    ]
}
