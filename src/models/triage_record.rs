use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Priority;

/// One persisted symptom-check outcome: what the nurse entered and what the
/// engine concluded, kept for the triage analytics view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageRecord {
    pub id: Uuid,
    pub patient_id: Option<Uuid>,
    pub nurse_id: Uuid,
    pub symptoms: String,
    pub priority: Priority,
    pub diagnosis: Option<String>,
    pub confidence: Option<f64>,
    pub predicted_outcome: Option<String>,
    pub created_at: DateTime<Utc>,
}
