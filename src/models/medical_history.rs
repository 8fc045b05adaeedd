use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::HistoryStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub condition: String,
    pub diagnosis_date: DateTime<Utc>,
    pub treatment: Option<String>,
    pub status: HistoryStatus,
    pub created_at: DateTime<Utc>,
}
