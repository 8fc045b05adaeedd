use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::{ConditionCategory, EngineError, Severity};
use crate::models::enums::{Gender, Priority};

/// One symptom keyword and its severity weight (loaded from lexicon.json
/// or the built-in table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub keyword: String,
    pub weight: f64,
}

/// Keyword → weight table driving symptom scoring. Built once at startup,
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    total_weight: f64,
}

impl Lexicon {
    /// The built-in keyword table. Weights are part of the documented
    /// scoring contract and are pinned by unit tests.
    pub fn builtin() -> Self {
        let entries = [
            ("chest pain", 0.90),
            ("shortness of breath", 0.85),
            ("seizure", 0.30),
            ("cough", 0.20),
            ("fever", 0.20),
            ("headache", 0.15),
            ("dizziness", 0.15),
            ("confusion", 0.15),
            ("wheezing", 0.10),
            ("nausea", 0.10),
        ]
        .into_iter()
        .map(|(keyword, weight)| LexiconEntry {
            keyword: keyword.to_string(),
            weight,
        })
        .collect();

        Self::from_entries(entries).expect("built-in lexicon is valid")
    }

    /// Load a lexicon override from a JSON file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::LexiconLoad(path.display().to_string(), e.to_string()))?;
        let entries: Vec<LexiconEntry> = serde_json::from_str(&json)
            .map_err(|e| EngineError::LexiconParse(path.display().to_string(), e.to_string()))?;
        Self::from_entries(entries)
    }

    /// Validate and normalize entries: keywords are matched lowercase with
    /// underscores treated as spaces.
    pub fn from_entries(entries: Vec<LexiconEntry>) -> Result<Self, EngineError> {
        if entries.is_empty() {
            return Err(EngineError::EmptyLexicon);
        }
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            if !(0.0..=1.0).contains(&entry.weight) {
                return Err(EngineError::InvalidWeight {
                    keyword: entry.keyword,
                    weight: entry.weight,
                });
            }
            normalized.push(LexiconEntry {
                keyword: normalize_keyword(&entry.keyword),
                weight: entry.weight,
            });
        }
        let total_weight = normalized.iter().map(|e| e.weight).sum();
        Ok(Self {
            entries: normalized,
            total_weight,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Sum of weights of every keyword found in `text` (case-insensitive
    /// substring match).
    pub fn matched_weight(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        self.entries
            .iter()
            .filter(|e| lower.contains(e.keyword.as_str()))
            .map(|e| e.weight)
            .sum()
    }

    pub fn weight_of(&self, keyword: &str) -> Option<f64> {
        let normalized = normalize_keyword(keyword);
        self.entries
            .iter()
            .find(|e| e.keyword == normalized)
            .map(|e| e.weight)
    }
}

fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase().replace('_', " ")
}

// ═══════════════════════════════════════════════════════════
// Condition table — diagnostic ranker reference data
// ═══════════════════════════════════════════════════════════

/// One rankable condition: trigger keywords, tie-break rank (more dangerous
/// first) and an optional documented gender skew.
#[derive(Debug, Clone)]
pub struct ConditionSpec {
    pub name: &'static str,
    pub category: ConditionCategory,
    pub triggers: &'static [&'static str],
    pub rank: u8,
    /// Mild confidence nudge when the report's gender matches the
    /// documented skew. Bounded with the demographic factors.
    pub gender_skew: Option<(Gender, f64)>,
}

pub const CONDITIONS: &[ConditionSpec] = &[
    ConditionSpec {
        name: "acute coronary syndrome",
        category: ConditionCategory::Cardiac,
        triggers: &["chest pain", "shortness of breath"],
        rank: 0,
        gender_skew: Some((Gender::Male, 1.05)),
    },
    ConditionSpec {
        name: "seizure disorder",
        category: ConditionCategory::Neurological,
        triggers: &["seizure", "confusion"],
        rank: 1,
        gender_skew: None,
    },
    ConditionSpec {
        name: "pneumonia",
        category: ConditionCategory::Respiratory,
        triggers: &["cough", "fever", "shortness of breath"],
        rank: 2,
        gender_skew: None,
    },
    ConditionSpec {
        name: "asthma exacerbation",
        category: ConditionCategory::Respiratory,
        triggers: &["wheezing", "shortness of breath", "cough"],
        rank: 3,
        gender_skew: None,
    },
    ConditionSpec {
        name: "migraine",
        category: ConditionCategory::Neurological,
        triggers: &["headache", "nausea", "dizziness"],
        rank: 4,
        gender_skew: None,
    },
    ConditionSpec {
        name: "influenza",
        category: ConditionCategory::Respiratory,
        triggers: &["fever", "cough", "headache"],
        rank: 5,
        gender_skew: None,
    },
    ConditionSpec {
        name: "vertigo",
        category: ConditionCategory::Neurological,
        triggers: &["dizziness", "nausea"],
        rank: 6,
        gender_skew: None,
    },
];

/// Keyword sets used by the predictor to classify a report into a category.
/// `Other` matches nothing and is the no-match default.
pub fn category_keywords(category: ConditionCategory) -> &'static [&'static str] {
    match category {
        ConditionCategory::Respiratory => &["cough", "shortness of breath", "wheezing"],
        ConditionCategory::Cardiac => &["chest pain"],
        ConditionCategory::Neurological => &["headache", "dizziness", "confusion", "seizure"],
        ConditionCategory::Other => &[],
    }
}

// ═══════════════════════════════════════════════════════════
// Recovery models — outcome predictor reference data
// ═══════════════════════════════════════════════════════════

/// Per-category recovery model. `confidence` is a fixed constant
/// reflecting model certainty, not recomputed from inputs.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryModel {
    pub base_days: f64,
    pub variance_days: f64,
    pub confidence: f64,
}

pub fn recovery_model(category: ConditionCategory) -> RecoveryModel {
    match category {
        ConditionCategory::Respiratory => RecoveryModel {
            base_days: 7.0,
            variance_days: 3.0,
            confidence: 0.70,
        },
        ConditionCategory::Cardiac => RecoveryModel {
            base_days: 14.0,
            variance_days: 7.0,
            confidence: 0.50,
        },
        ConditionCategory::Neurological => RecoveryModel {
            base_days: 21.0,
            variance_days: 10.0,
            confidence: 0.35,
        },
        ConditionCategory::Other => RecoveryModel {
            base_days: 10.0,
            variance_days: 5.0,
            confidence: 0.60,
        },
    }
}

/// Category component of the complications-risk multiplier.
pub fn risk_base(category: ConditionCategory) -> f64 {
    match category {
        ConditionCategory::Respiratory => 1.0,
        ConditionCategory::Cardiac => 1.8,
        ConditionCategory::Neurological => 1.5,
        ConditionCategory::Other => 0.8,
    }
}

/// Priority component of the complications-risk multiplier.
pub fn priority_multiplier(priority: Priority) -> f64 {
    match priority {
        Priority::Low => 0.8,
        Priority::Medium => 1.0,
        Priority::High => 1.3,
    }
}

/// Fraction of the recovery estimate spent as bed days.
pub fn bed_days_factor(category: ConditionCategory) -> f64 {
    match category {
        ConditionCategory::Respiratory => 0.3,
        ConditionCategory::Cardiac => 0.6,
        ConditionCategory::Neurological => 0.5,
        ConditionCategory::Other => 0.3,
    }
}

/// Follow-up visit count by category and risk level.
pub fn follow_up_visits(category: ConditionCategory, risk: Severity) -> i64 {
    let by_risk = match category {
        ConditionCategory::Respiratory | ConditionCategory::Other => [1, 2, 3],
        ConditionCategory::Cardiac | ConditionCategory::Neurological => [2, 3, 4],
    };
    match risk {
        Severity::Low => by_risk[0],
        Severity::Medium => by_risk[1],
        Severity::High => by_risk[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lexicon_documented_weights() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.len(), 10);
        assert!((lexicon.total_weight() - 3.10).abs() < 1e-9);
        assert_eq!(lexicon.weight_of("chest pain"), Some(0.90));
        assert_eq!(lexicon.weight_of("shortness_of_breath"), Some(0.85));
        assert_eq!(lexicon.weight_of("typhoid"), None);
    }

    #[test]
    fn all_weights_within_unit_interval() {
        let lexicon = Lexicon::builtin();
        for entry in &lexicon.entries {
            assert!((0.0..=1.0).contains(&entry.weight), "{}", entry.keyword);
        }
    }

    #[test]
    fn matched_weight_is_case_insensitive() {
        let lexicon = Lexicon::builtin();
        let w = lexicon.matched_weight("Sudden CHEST PAIN after exertion");
        assert!((w - 0.90).abs() < 1e-9);
    }

    #[test]
    fn matched_weight_empty_text_is_zero() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.matched_weight(""), 0.0);
    }

    #[test]
    fn underscored_keywords_normalize_to_spaces() {
        let lexicon = Lexicon::from_entries(vec![LexiconEntry {
            keyword: "shortness_of_breath".into(),
            weight: 0.85,
        }])
        .unwrap();
        assert!(lexicon.matched_weight("patient reports shortness of breath") > 0.0);
    }

    #[test]
    fn load_rejects_out_of_range_weight() {
        let result = Lexicon::from_entries(vec![LexiconEntry {
            keyword: "fever".into(),
            weight: 1.5,
        }]);
        assert!(matches!(result, Err(EngineError::InvalidWeight { .. })));
    }

    #[test]
    fn load_rejects_empty_table() {
        assert!(matches!(
            Lexicon::from_entries(vec![]),
            Err(EngineError::EmptyLexicon)
        ));
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        std::fs::write(
            &path,
            r#"[{"keyword": "chest pain", "weight": 0.9}, {"keyword": "cough", "weight": 0.2}]"#,
        )
        .unwrap();

        let lexicon = Lexicon::load(&path).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert!((lexicon.total_weight() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Lexicon::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(EngineError::LexiconLoad(..))));
    }

    #[test]
    fn bundled_resource_matches_builtin() {
        let entries: Vec<LexiconEntry> =
            serde_json::from_str(include_str!("../../resources/lexicon.json")).unwrap();
        let bundled = Lexicon::from_entries(entries).unwrap();
        let builtin = Lexicon::builtin();
        assert_eq!(bundled.len(), builtin.len());
        assert!((bundled.total_weight() - builtin.total_weight()).abs() < 1e-9);
    }

    #[test]
    fn condition_triggers_are_lexicon_keywords() {
        let lexicon = Lexicon::builtin();
        for spec in CONDITIONS {
            for trigger in spec.triggers {
                assert!(
                    lexicon.weight_of(trigger).is_some(),
                    "{} trigger {trigger:?} missing from lexicon",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn condition_ranks_are_unique() {
        let mut ranks: Vec<u8> = CONDITIONS.iter().map(|c| c.rank).collect();
        ranks.sort_unstable();
        ranks.dedup();
        assert_eq!(ranks.len(), CONDITIONS.len());
    }

    #[test]
    fn category_keywords_are_lexicon_keywords() {
        let lexicon = Lexicon::builtin();
        for category in ConditionCategory::ALL {
            for keyword in category_keywords(category) {
                assert!(lexicon.weight_of(keyword).is_some(), "{keyword}");
            }
        }
    }

    #[test]
    fn other_category_matches_nothing() {
        assert!(category_keywords(ConditionCategory::Other).is_empty());
    }

    #[test]
    fn recovery_models_documented_constants() {
        let resp = recovery_model(ConditionCategory::Respiratory);
        assert_eq!(resp.base_days, 7.0);
        assert_eq!(resp.confidence, 0.70);
        let cardiac = recovery_model(ConditionCategory::Cardiac);
        assert_eq!(cardiac.base_days, 14.0);
        assert_eq!(cardiac.variance_days, 7.0);
        let other = recovery_model(ConditionCategory::Other);
        assert_eq!(other.base_days, 10.0);
    }

    #[test]
    fn follow_up_visits_scale_with_risk() {
        for category in ConditionCategory::ALL {
            let low = follow_up_visits(category, Severity::Low);
            let medium = follow_up_visits(category, Severity::Medium);
            let high = follow_up_visits(category, Severity::High);
            assert!(low < medium && medium < high);
        }
    }

    #[test]
    fn priority_multiplier_ordering() {
        assert!(priority_multiplier(Priority::Low) < priority_multiplier(Priority::Medium));
        assert!(priority_multiplier(Priority::Medium) < priority_multiplier(Priority::High));
    }
}
