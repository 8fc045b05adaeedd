//! Engine introspection endpoints: readiness and model metadata.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::types::{ApiContext, NurseContext};
use crate::engine::lexicon::CONDITIONS;
use crate::engine::types::{ConditionCategory, HIGH_THRESHOLD, MEDIUM_THRESHOLD};
use crate::engine::{DIAGNOSTIC_MODEL_VERSION, PREDICTIVE_MODEL_VERSION};

#[derive(Serialize)]
pub struct EngineStatusResponse {
    pub status: &'static str,
    pub diagnostic_version: &'static str,
    pub predictive_version: &'static str,
    pub lexicon_keywords: usize,
}

/// `GET /api/engine/status` — engine readiness for the dashboard.
pub async fn status(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
) -> Json<EngineStatusResponse> {
    Json(EngineStatusResponse {
        status: "ok",
        diagnostic_version: DIAGNOSTIC_MODEL_VERSION,
        predictive_version: PREDICTIVE_MODEL_VERSION,
        lexicon_keywords: ctx.core.engine().lexicon().len(),
    })
}

#[derive(Serialize)]
pub struct DiagnosticModelInfo {
    pub version: &'static str,
    pub high_threshold: f64,
    pub medium_threshold: f64,
    pub supported_conditions: Vec<&'static str>,
    pub lexicon_keywords: usize,
}

#[derive(Serialize)]
pub struct PredictiveModelInfo {
    pub version: &'static str,
    pub supported_categories: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct EngineModelsResponse {
    pub diagnostic: DiagnosticModelInfo,
    pub predictive: PredictiveModelInfo,
}

/// `GET /api/engine/models` — model metadata for the dashboard.
pub async fn models(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
) -> Json<EngineModelsResponse> {
    Json(EngineModelsResponse {
        diagnostic: DiagnosticModelInfo {
            version: DIAGNOSTIC_MODEL_VERSION,
            high_threshold: HIGH_THRESHOLD,
            medium_threshold: MEDIUM_THRESHOLD,
            supported_conditions: CONDITIONS.iter().map(|c| c.name).collect(),
            lexicon_keywords: ctx.core.engine().lexicon().len(),
        },
        predictive: PredictiveModelInfo {
            version: PREDICTIVE_MODEL_VERSION,
            supported_categories: ConditionCategory::ALL
                .iter()
                .map(|c| c.as_str())
                .collect(),
        },
    })
}
