//! Symptom checker endpoint backed by the diagnostic ranker.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, NurseContext};
use crate::core_state::{PredictionEntry, PredictionKind};
use crate::db::repository;
use crate::engine::types::{DiagnosisCandidate, Severity, SymptomReport};
use crate::engine::MessageTemplates;
use crate::models::enums::{Gender, Priority};
use crate::models::TriageRecord;

#[derive(Deserialize)]
pub struct CheckSymptomsRequest {
    pub symptoms: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    /// When present, the assessment is persisted as a triage record.
    pub patient_id: Option<String>,
}

#[derive(Serialize)]
pub struct CheckSymptomsResponse {
    pub diagnosis: Vec<DiagnosisCandidate>,
    pub recommendations: Vec<String>,
    pub confidence: f64,
    pub disclaimer: &'static str,
}

fn severity_to_priority(severity: Severity) -> Priority {
    match severity {
        Severity::High => Priority::High,
        Severity::Medium => Priority::Medium,
        Severity::Low => Priority::Low,
    }
}

/// `POST /api/symptoms/check` — rank diagnosis candidates for a report.
pub async fn check(
    State(ctx): State<ApiContext>,
    Extension(nurse): Extension<NurseContext>,
    Json(req): Json<CheckSymptomsRequest>,
) -> Result<Json<CheckSymptomsResponse>, ApiError> {
    let report = SymptomReport {
        text: req.symptoms.unwrap_or_default(),
        age: req.age,
        gender: req.gender.unwrap_or_default(),
    };
    let assessment = ctx.core.engine().check_symptoms(&report);

    if let Some(raw_id) = &req.patient_id {
        let patient_id = Uuid::parse_str(raw_id)
            .map_err(|e| ApiError::BadRequest(format!("Invalid patient ID: {e}")))?;
        let conn = ctx.core.open_db()?;
        repository::get_patient(&conn, &patient_id)?
            .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;

        // Candidates are confidence-sorted, so the first carries the
        // highest severity tier
        if let Some(top) = assessment.diagnoses.first() {
            let record = TriageRecord {
                id: Uuid::new_v4(),
                patient_id: Some(patient_id),
                nurse_id: nurse.nurse_id,
                symptoms: report.text.clone(),
                priority: severity_to_priority(top.severity),
                diagnosis: Some(top.condition.clone()),
                confidence: Some(assessment.confidence),
                predicted_outcome: None,
                created_at: Utc::now(),
            };
            repository::insert_triage_record(&conn, &record)?;
        }
    }

    ctx.core.log_prediction(PredictionEntry {
        timestamp: Utc::now(),
        kind: PredictionKind::Diagnosis,
        nurse_id: Some(nurse.nurse_id),
        condition: assessment.diagnoses.first().map(|d| d.condition.clone()),
        confidence: assessment.confidence,
        summary: json!({
            "candidates": assessment.diagnoses.len(),
            "age": req.age,
            "gender": report.gender.as_str(),
        }),
    });

    Ok(Json(CheckSymptomsResponse {
        diagnosis: assessment.diagnoses,
        recommendations: assessment.recommendations,
        confidence: assessment.confidence,
        disclaimer: MessageTemplates::diagnostic_disclaimer(),
    }))
}
