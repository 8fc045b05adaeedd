//! Analytics endpoints: outcome prediction, triage aggregates, health trends.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, NurseContext};
use crate::core_state::{PredictionEntry, PredictionKind};
use crate::db::repository;
use crate::engine::trends::HealthTrends;
use crate::engine::types::{PredictionInput, PredictionResult};
use crate::engine::MessageTemplates;
use crate::models::enums::{Gender, Priority};

// ── Outcome prediction ──────────────────────────────────────

#[derive(Deserialize)]
pub struct PredictRequest {
    pub symptoms: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub priority: Option<Priority>,
    pub medical_history: Option<String>,
}

#[derive(Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub disclaimer: &'static str,
}

/// `POST /api/analytics/predictive` — predict clinical outcomes.
pub async fn predictive(
    State(ctx): State<ApiContext>,
    Extension(nurse): Extension<NurseContext>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let input = PredictionInput {
        symptoms: req.symptoms.unwrap_or_default(),
        age: req.age,
        gender: req.gender.unwrap_or_default(),
        medical_history: req.medical_history,
        priority: req.priority.unwrap_or_default(),
    };
    let result = ctx.core.engine().predict_outcomes(&input);

    ctx.core.log_prediction(PredictionEntry {
        timestamp: Utc::now(),
        kind: PredictionKind::Predictive,
        nurse_id: Some(nurse.nurse_id),
        condition: Some(result.condition_type.as_str().to_string()),
        confidence: result.recovery_time.confidence,
        summary: json!({
            "priority": input.priority.as_str(),
            "risk_level": result.complications_risk.risk_level.as_str(),
            "estimated_days": result.recovery_time.estimated_days,
            "has_history": input.medical_history.is_some(),
        }),
    });

    Ok(Json(PredictResponse {
        result,
        disclaimer: MessageTemplates::predictive_disclaimer(),
    }))
}

// ── Triage aggregates ───────────────────────────────────────

#[derive(Serialize)]
pub struct TriageDayStats {
    pub date: NaiveDate,
    pub total_patients: i64,
    pub high_priority: i64,
    pub medium_priority: i64,
    pub low_priority: i64,
}

#[derive(Serialize)]
pub struct TriageSummary {
    pub total_patients_week: i64,
    pub high_priority_percentage: f64,
}

#[derive(Serialize)]
pub struct TriageAnalyticsResponse {
    pub daily_stats: Vec<TriageDayStats>,
    pub summary: TriageSummary,
}

/// `GET /api/analytics/triage` — per-day triage counts for the last week,
/// aggregated from stored triage records.
pub async fn triage(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
) -> Result<Json<TriageAnalyticsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let stats = repository::triage_daily_counts(&conn, Utc::now().date_naive(), 7)?;

    let total: i64 = stats.iter().map(|s| s.total).sum();
    let high: i64 = stats.iter().map(|s| s.high).sum();
    let high_priority_percentage = if total > 0 {
        (high as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    Ok(Json(TriageAnalyticsResponse {
        daily_stats: stats
            .into_iter()
            .map(|s| TriageDayStats {
                date: s.date,
                total_patients: s.total,
                high_priority: s.high,
                medium_priority: s.medium,
                low_priority: s.low,
            })
            .collect(),
        summary: TriageSummary {
            total_patients_week: total,
            high_priority_percentage,
        },
    }))
}

// ── Health trends ───────────────────────────────────────────

/// `GET /api/analytics/trends` — fixed seasonal/demographic summary.
pub async fn trends(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
) -> Json<HealthTrends> {
    Json(ctx.core.engine().trends())
}
