use super::lexicon::{category_keywords, Lexicon};
use super::types::ConditionCategory;
use crate::models::enums::Gender;

/// Demographic factors can only perturb the symptom score, never dominate it.
pub const FACTOR_MIN: f64 = 0.8;
pub const FACTOR_MAX: f64 = 1.3;

/// Oldest accepted age; out-of-range input is clamped, not rejected.
pub const MAX_AGE: i64 = 120;

pub fn clamp_age(age: i64) -> i64 {
    age.clamp(0, MAX_AGE)
}

/// Risk weighting by age band: elevated under 5 and over 65, neutral in
/// between and when unknown.
pub fn age_factor(age: Option<i64>) -> f64 {
    match age.map(clamp_age) {
        Some(a) if a < 5 => 1.2,
        Some(a) if a > 65 => 1.3,
        _ => 1.0,
    }
}

/// Globally neutral; documented per-condition skews are applied by the
/// ranker to individual candidates. Unknown is always neutral.
pub fn gender_factor(_gender: Gender) -> f64 {
    1.0
}

/// Scoring/classification capability. The keyword lexicon is the only
/// current implementation; a statistical model can replace it without
/// changing the ranker or predictor contracts.
pub trait SymptomModel: Send + Sync {
    /// Weighted severity score in [0, 1]. Empty text scores 0.0.
    fn score(&self, text: &str) -> f64;

    /// Classify free text into exactly one condition category.
    fn classify(&self, text: &str) -> ConditionCategory;
}

/// Lexicon-backed implementation of [`SymptomModel`].
#[derive(Debug, Clone)]
pub struct KeywordModel {
    lexicon: Lexicon,
}

impl KeywordModel {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl SymptomModel for KeywordModel {
    fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let total = self.lexicon.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        (self.lexicon.matched_weight(text) / total).clamp(0.0, 1.0)
    }

    fn classify(&self, text: &str) -> ConditionCategory {
        if text.trim().is_empty() {
            return ConditionCategory::Other;
        }
        let lower = text.to_lowercase();

        let mut best = ConditionCategory::Other;
        let mut best_score = 0.0;
        for category in ConditionCategory::ALL {
            let keywords = category_keywords(category);
            let total: f64 = keywords
                .iter()
                .filter_map(|k| self.lexicon.weight_of(k))
                .sum();
            if total <= 0.0 {
                continue;
            }
            let matched: f64 = keywords
                .iter()
                .filter(|k| lower.contains(**k))
                .filter_map(|k| self.lexicon.weight_of(k))
                .sum();
            let score = (matched / total).clamp(0.0, 1.0);
            if score > best_score
                || (score == best_score && score > 0.0 && category.rank() < best.rank())
            {
                best = category;
                best_score = score;
            }
        }
        best
    }
}
