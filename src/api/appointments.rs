//! Appointment handlers.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult, ValidationErrorKind};
use crate::store::Appointment;
use crate::validation::{appointment_update, new_appointment, Fields};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct AppointmentQuery {
    /// Exact `appointment_date` to match.
    pub date: Option<String>,
}

/// Body of `GET /appointments`.
#[derive(Debug, Serialize)]
pub struct AppointmentList {
    pub appointments: Vec<Appointment>,
    pub total: usize,
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentQuery>,
) -> Json<AppointmentList> {
    let appointments = match query.date {
        Some(date) => state
            .store
            .appointments
            .filter(|a| a.appointment_date == date),
        None => state.store.appointments.list(),
    };
    Json(AppointmentList {
        total: appointments.len(),
        appointments,
    })
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    state
        .store
        .appointments
        .get(&id)
        .map(Json)
        .ok_or(ApiError::NotFound {
            resource: "Appointment",
            id,
        })
}

pub async fn create_appointment(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    let appointment = new_appointment(&Fields::from_slice(&body)?)?;

    if !state.store.patients.contains(&appointment.patient_id) {
        return Err(ApiError::validation(ValidationErrorKind::UnknownPatient {
            patient_id: appointment.patient_id,
        }));
    }

    state.store.appointments.insert(appointment.clone());
    info!(
        id = %appointment.id,
        patient_id = %appointment.patient_id,
        "Appointment created"
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Appointment>> {
    let update = appointment_update(&Fields::from_slice(&body)?)?;

    match state.store.appointments.update(&id, |a| update.apply(a)) {
        Some(updated) => {
            info!(id = %updated.id, "Appointment updated");
            Ok(Json(updated))
        }
        None => Err(ApiError::NotFound {
            resource: "Appointment",
            id,
        }),
    }
}
