//! Patient record and medical history endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, NurseContext};
use crate::db::repository;
use crate::engine::scorer::MAX_AGE;
use crate::models::enums::{Gender, HistoryStatus};
use crate::models::{MedicalHistory, Patient};

fn parse_patient_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("Invalid patient ID: {e}")))
}

fn load_patient(conn: &rusqlite::Connection, id: &Uuid) -> Result<Patient, ApiError> {
    repository::get_patient(conn, id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))
}

// ── Create / list / detail ──────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub gender: Option<Gender>,
}

#[derive(Serialize)]
pub struct CreatePatientResponse {
    pub patient_id: Uuid,
    pub message: &'static str,
}

/// `POST /api/patients` — register a patient.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
    Json(req): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<CreatePatientResponse>), ApiError> {
    let patient = Patient {
        id: Uuid::new_v4(),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        age: req.age.clamp(0, MAX_AGE),
        gender: req.gender.unwrap_or_default(),
        created_at: Utc::now(),
    };

    let conn = ctx.core.open_db()?;
    repository::insert_patient(&conn, &patient)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePatientResponse {
            patient_id: patient.id,
            message: "Patient created successfully",
        }),
    ))
}

/// `GET /api/patients` — all patients, newest intake first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let conn = ctx.core.open_db()?;
    let patients = repository::list_patients(&conn)?;
    Ok(Json(patients))
}

/// `GET /api/patients/:id` — single patient record.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let patient_id = parse_patient_id(&patient_id)?;
    let conn = ctx.core.open_db()?;
    let patient = load_patient(&conn, &patient_id)?;
    Ok(Json(patient))
}

// ── Medical history ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddHistoryRequest {
    pub condition: String,
    pub diagnosis_date: Option<DateTime<Utc>>,
    pub treatment: Option<String>,
    pub status: Option<HistoryStatus>,
}

#[derive(Serialize)]
pub struct AddHistoryResponse {
    pub history_id: Uuid,
    pub message: &'static str,
}

/// `POST /api/patients/:id/medical-history` — record a diagnosis.
pub async fn add_history(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
    Path(patient_id): Path<String>,
    Json(req): Json<AddHistoryRequest>,
) -> Result<(StatusCode, Json<AddHistoryResponse>), ApiError> {
    if req.condition.trim().is_empty() {
        return Err(ApiError::BadRequest("Condition is required".into()));
    }

    let patient_id = parse_patient_id(&patient_id)?;
    let conn = ctx.core.open_db()?;
    load_patient(&conn, &patient_id)?;

    let entry = MedicalHistory {
        id: Uuid::new_v4(),
        patient_id,
        condition: req.condition.trim().to_string(),
        diagnosis_date: req.diagnosis_date.unwrap_or_else(Utc::now),
        treatment: req.treatment.filter(|t| !t.trim().is_empty()),
        status: req.status.unwrap_or_default(),
        created_at: Utc::now(),
    };
    repository::insert_medical_history(&conn, &entry)?;

    Ok((
        StatusCode::CREATED,
        Json(AddHistoryResponse {
            history_id: entry.id,
            message: "Medical history added successfully",
        }),
    ))
}

/// `GET /api/patients/:id/medical-history` — newest diagnosis first.
pub async fn history(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<MedicalHistory>>, ApiError> {
    let patient_id = parse_patient_id(&patient_id)?;
    let conn = ctx.core.open_db()?;
    load_patient(&conn, &patient_id)?;
    let entries = repository::get_medical_history_for_patient(&conn, &patient_id)?;
    Ok(Json(entries))
}
