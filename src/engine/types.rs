use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::{Gender, Priority};

/// One symptom-check request as the engine sees it. Built per request,
/// dropped after the response.
#[derive(Debug, Clone)]
pub struct SymptomReport {
    pub text: String,
    /// Years; values outside 0..=120 are clamped, `None` is neutral.
    pub age: Option<i64>,
    pub gender: Gender,
}

/// Input for outcome prediction: a symptom report plus triage priority and
/// optional free-text history (recorded alongside the prediction, not scored).
#[derive(Debug, Clone)]
pub struct PredictionInput {
    pub symptoms: String,
    pub age: Option<i64>,
    pub gender: Gender,
    pub medical_history: Option<String>,
    pub priority: Priority,
}

/// Discretized tier derived from a confidence or probability.
/// Ordering matters: `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Tier thresholds. Fixed by design, not tuned per request.
pub const HIGH_THRESHOLD: f64 = 0.7;
pub const MEDIUM_THRESHOLD: f64 = 0.4;

impl Severity {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_THRESHOLD {
            Self::High
        } else if confidence >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Coarse clinical grouping used to select a recovery model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Respiratory,
    Cardiac,
    Neurological,
    Other,
}

impl ConditionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Respiratory => "respiratory",
            Self::Cardiac => "cardiac",
            Self::Neurological => "neurological",
            Self::Other => "other",
        }
    }

    /// Fixed tie-break order for classification: lower wins.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Cardiac => 0,
            Self::Neurological => 1,
            Self::Respiratory => 2,
            Self::Other => 3,
        }
    }

    pub const ALL: [ConditionCategory; 4] = [
        Self::Respiratory,
        Self::Cardiac,
        Self::Neurological,
        Self::Other,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisCandidate {
    pub condition: String,
    pub confidence: f64,
    pub severity: Severity,
}

/// Output of the diagnostic ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub diagnoses: Vec<DiagnosisCandidate>,
    pub recommendations: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryEstimate {
    pub estimated_days: f64,
    pub confidence: f64,
    pub range_min: f64,
    pub range_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplicationsRisk {
    pub risk_level: Severity,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNeeds {
    pub bed_days: i64,
    pub specialist_required: bool,
    pub follow_up_visits: i64,
}

/// Probabilities sum to 1.0 within floating tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub full_recovery: f64,
    pub partial_recovery: f64,
    pub chronic_condition: f64,
}

/// Output of the outcome predictor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub condition_type: ConditionCategory,
    pub recovery_time: RecoveryEstimate,
    pub complications_risk: ComplicationsRisk,
    pub resource_needs: ResourceNeeds,
    pub outcome_probabilities: OutcomeProbabilities,
}

/// Errors raised while loading engine reference data at startup.
/// Request-time scoring never fails.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read lexicon file {0}: {1}")]
    LexiconLoad(String, String),
    #[error("Failed to parse lexicon file {0}: {1}")]
    LexiconParse(String, String),
    #[error("Lexicon keyword {keyword:?} has weight {weight} outside [0, 1]")]
    InvalidWeight { keyword: String, weight: f64 },
    #[error("Lexicon is empty")]
    EmptyLexicon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_thresholds() {
        assert_eq!(Severity::from_confidence(0.0), Severity::Low);
        assert_eq!(Severity::from_confidence(0.39), Severity::Low);
        assert_eq!(Severity::from_confidence(0.4), Severity::Medium);
        assert_eq!(Severity::from_confidence(0.69), Severity::Medium);
        assert_eq!(Severity::from_confidence(0.7), Severity::High);
        assert_eq!(Severity::from_confidence(1.0), Severity::High);
    }

    #[test]
    fn severity_ordering_puts_high_last() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn category_tie_break_order() {
        assert!(ConditionCategory::Cardiac.rank() < ConditionCategory::Neurological.rank());
        assert!(ConditionCategory::Neurological.rank() < ConditionCategory::Respiratory.rank());
        assert!(ConditionCategory::Respiratory.rank() < ConditionCategory::Other.rank());
    }
}
