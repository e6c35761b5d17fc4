//! Patient handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::store::Patient;
use crate::validation::{new_patient, Fields};

use super::AppState;

/// Body of `GET /patients`.
#[derive(Debug, Serialize)]
pub struct PatientList {
    pub patients: Vec<Patient>,
    pub total: usize,
}

pub async fn list_patients(State(state): State<AppState>) -> Json<PatientList> {
    let patients = state.store.patients.list();
    Json(PatientList {
        total: patients.len(),
        patients,
    })
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Patient>> {
    state
        .store
        .patients
        .get(&id)
        .map(Json)
        .ok_or(ApiError::NotFound {
            resource: "Patient",
            id,
        })
}

pub async fn create_patient(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    let patient = new_patient(&Fields::from_slice(&body)?)?;
    state.store.patients.insert(patient.clone());
    info!(id = %patient.id, "Patient created");
    Ok((StatusCode::CREATED, Json(patient)))
}
