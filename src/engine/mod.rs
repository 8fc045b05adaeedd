//! Diagnostic & predictive scoring engine.
//!
//! Pure, synchronous and stateless with respect to request data: the lexicon
//! and condition tables are loaded once at startup and never mutated, so any
//! number of requests may be evaluated concurrently without locking.

pub mod diagnostic;
pub mod lexicon;
pub mod messages;
pub mod predictive;
pub mod scorer;
pub mod trends;
pub mod types;

pub use lexicon::Lexicon;
pub use messages::MessageTemplates;
pub use scorer::{KeywordModel, SymptomModel};
pub use types::*;

pub const DIAGNOSTIC_MODEL_VERSION: &str = "diagnostic_v1.0";
pub const PREDICTIVE_MODEL_VERSION: &str = "predictive_v1.0";

/// The engine facade: a keyword model plus the static condition tables.
pub struct Engine {
    model: KeywordModel,
}

impl Engine {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            model: KeywordModel::new(lexicon),
        }
    }

    pub fn with_builtin_lexicon() -> Self {
        Self::new(Lexicon::builtin())
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.model.lexicon()
    }

    /// Rank diagnosis candidates for a symptom report.
    pub fn check_symptoms(&self, report: &SymptomReport) -> TriageAssessment {
        diagnostic::rank(report, &self.model)
    }

    /// Predict clinical outcomes for a symptom report.
    pub fn predict_outcomes(&self, input: &PredictionInput) -> PredictionResult {
        predictive::predict(input, &self.model)
    }

    /// Seasonal and demographic summary for the dashboard.
    pub fn trends(&self) -> trends::HealthTrends {
        trends::report()
    }
}
