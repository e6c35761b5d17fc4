//! Record types served by the API.

use serde::{Deserialize, Serialize};

/// Anything kept in a [`super::Collection`].
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> &str;
}

/// A patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub created_at: String,
}

/// An appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_name: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub notes: String,
    pub created_at: String,
}

impl Record for Patient {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Appointment {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Changes to an appointment; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentUpdate {
    pub doctor_name: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub duration_minutes: Option<u32>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentUpdate {
    /// Apply the set fields to an appointment.
    pub fn apply(self, appointment: &mut Appointment) {
        if let Some(v) = self.doctor_name {
            appointment.doctor_name = v;
        }
        if let Some(v) = self.appointment_date {
            appointment.appointment_date = v;
        }
        if let Some(v) = self.appointment_time {
            appointment.appointment_time = v;
        }
        if let Some(v) = self.duration_minutes {
            appointment.duration_minutes = v;
        }
        if let Some(v) = self.kind {
            appointment.kind = v;
        }
        if let Some(v) = self.status {
            appointment.status = v;
        }
        if let Some(v) = self.notes {
            appointment.notes = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_type_field_name() {
        let appointment = Appointment {
            id: "apt_x".to_string(),
            patient_id: "pat_001".to_string(),
            doctor_name: "Dr. Leblanc".to_string(),
            appointment_date: "2024-03-20".to_string(),
            appointment_time: "14:30".to_string(),
            duration_minutes: 30,
            kind: "consultation".to_string(),
            status: "scheduled".to_string(),
            notes: String::new(),
            created_at: "2024-01-15T11:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&appointment).unwrap();
        assert_eq!(json["type"], "consultation");
        assert!(json.get("kind").is_none());
    }
}
