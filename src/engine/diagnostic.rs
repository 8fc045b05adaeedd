use super::lexicon::{ConditionSpec, CONDITIONS};
use super::messages::MessageTemplates;
use super::scorer::{age_factor, gender_factor, SymptomModel, FACTOR_MAX, FACTOR_MIN};
use super::types::{DiagnosisCandidate, Severity, SymptomReport, TriageAssessment};
use crate::models::enums::Gender;

/// Upper bound on returned candidates.
pub const MAX_CANDIDATES: usize = 5;

/// Rank diagnosis candidates for a symptom report.
///
/// Total over all inputs: degenerate reports (empty text) yield an empty
/// candidate list with confidence 0.0 and a request for details.
pub fn rank(report: &SymptomReport, model: &dyn SymptomModel) -> TriageAssessment {
    if report.text.trim().is_empty() {
        return TriageAssessment {
            diagnoses: Vec::new(),
            recommendations: vec![MessageTemplates::request_details()],
            confidence: 0.0,
        };
    }

    let symptom_score = model.score(&report.text);
    let combined = (symptom_score * age_factor(report.age) * gender_factor(report.gender))
        .clamp(0.0, 1.0);

    let lower = report.text.to_lowercase();
    let mut ranked: Vec<(u8, DiagnosisCandidate)> = CONDITIONS
        .iter()
        .filter_map(|spec| {
            candidate_for(spec, &lower, combined, report.gender).map(|c| (spec.rank, c))
        })
        .collect();

    // Descending confidence, fixed condition rank breaks ties
    ranked.sort_by(|(rank_a, a), (rank_b, b)| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(rank_a.cmp(rank_b))
    });
    ranked.truncate(MAX_CANDIDATES);

    let diagnoses: Vec<DiagnosisCandidate> = ranked.into_iter().map(|(_, c)| c).collect();
    let recommendations = build_recommendations(&diagnoses);

    TriageAssessment {
        diagnoses,
        recommendations,
        confidence: combined,
    }
}

fn candidate_for(
    spec: &ConditionSpec,
    text_lower: &str,
    combined: f64,
    gender: Gender,
) -> Option<DiagnosisCandidate> {
    let matched = spec
        .triggers
        .iter()
        .filter(|k| text_lower.contains(**k))
        .count();
    if matched == 0 {
        return None;
    }

    let fraction = matched as f64 / spec.triggers.len() as f64;
    let mut confidence = combined * fraction;

    if let Some((skew_gender, skew)) = spec.gender_skew {
        if gender == skew_gender && gender != Gender::Unknown {
            confidence *= skew.clamp(FACTOR_MIN, FACTOR_MAX);
        }
    }
    let confidence = confidence.clamp(0.0, 1.0);

    Some(DiagnosisCandidate {
        condition: spec.name.to_string(),
        confidence,
        severity: Severity::from_confidence(confidence),
    })
}

fn build_recommendations(diagnoses: &[DiagnosisCandidate]) -> Vec<String> {
    let Some(top_tier) = diagnoses.iter().map(|d| d.severity).max() else {
        return vec![MessageTemplates::tier_guidance(Severity::Low)];
    };

    let mut recommendations = vec![MessageTemplates::tier_guidance(top_tier)];
    for candidate in diagnoses {
        if candidate.severity >= Severity::Medium {
            recommendations.push(MessageTemplates::condition_followup(
                &candidate.condition,
                candidate.severity,
            ));
        }
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lexicon::Lexicon;
    use crate::engine::scorer::KeywordModel;

    fn model() -> KeywordModel {
        KeywordModel::new(Lexicon::builtin())
    }

    fn report(text: &str, age: Option<i64>, gender: Gender) -> SymptomReport {
        SymptomReport {
            text: text.to_string(),
            age,
            gender,
        }
    }

    #[test]
    fn empty_report_returns_no_candidates() {
        let assessment = rank(&report("", None, Gender::Unknown), &model());
        assert!(assessment.diagnoses.is_empty());
        assert_eq!(assessment.confidence, 0.0);
        assert_eq!(assessment.recommendations.len(), 1);
        assert!(assessment.recommendations[0].contains("symptoms"));
    }

    #[test]
    fn whitespace_report_treated_as_empty() {
        let assessment = rank(&report("   \n", Some(40), Gender::Female), &model());
        assert!(assessment.diagnoses.is_empty());
        assert_eq!(assessment.confidence, 0.0);
    }

    #[test]
    fn elderly_chest_pain_surfaces_high_cardiac_candidate() {
        let assessment = rank(
            &report("chest pain and shortness of breath", Some(70), Gender::Male),
            &model(),
        );
        let top = &assessment.diagnoses[0];
        assert_eq!(top.condition, "acute coronary syndrome");
        assert_eq!(top.severity, Severity::High);
        assert!(top.confidence >= 0.7);
        assert!(assessment.confidence >= 0.7);
    }

    #[test]
    fn all_confidences_within_unit_interval() {
        let texts = [
            "cough",
            "chest pain and shortness of breath with seizure and confusion",
            "headache dizziness nausea fever wheezing",
        ];
        for text in texts {
            for age in [None, Some(2), Some(40), Some(90)] {
                let assessment = rank(&report(text, age, Gender::Male), &model());
                assert!((0.0..=1.0).contains(&assessment.confidence));
                for d in &assessment.diagnoses {
                    assert!((0.0..=1.0).contains(&d.confidence), "{}", d.condition);
                }
            }
        }
    }

    #[test]
    fn candidates_sorted_descending() {
        let assessment = rank(
            &report("cough fever headache and chest pain", Some(30), Gender::Unknown),
            &model(),
        );
        assert!(assessment.diagnoses.len() >= 2);
        for pair in assessment.diagnoses.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn candidate_count_is_bounded() {
        let everything =
            "chest pain shortness of breath seizure confusion cough fever headache dizziness wheezing nausea";
        let assessment = rank(&report(everything, Some(70), Gender::Male), &model());
        assert!(assessment.diagnoses.len() <= MAX_CANDIDATES);
    }

    #[test]
    fn tie_break_follows_condition_rank() {
        // Both pneumonia (rank 2) and asthma exacerbation (rank 3) match
        // {cough, shortness of breath}: 2/3 each, identical confidence.
        let assessment = rank(
            &report("cough with shortness of breath", Some(30), Gender::Unknown),
            &model(),
        );
        let pneumonia_pos = assessment
            .diagnoses
            .iter()
            .position(|d| d.condition == "pneumonia")
            .unwrap();
        let asthma_pos = assessment
            .diagnoses
            .iter()
            .position(|d| d.condition == "asthma exacerbation")
            .unwrap();
        assert!(pneumonia_pos < asthma_pos);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let r = report("fever and cough with headache", Some(55), Gender::Female);
        let m = model();
        let a = rank(&r, &m);
        let b = rank(&r, &m);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.diagnoses.len(), b.diagnoses.len());
        for (x, y) in a.diagnoses.iter().zip(&b.diagnoses) {
            assert_eq!(x.condition, y.condition);
            assert_eq!(x.confidence, y.confidence);
        }
        assert_eq!(a.recommendations, b.recommendations);
    }

    #[test]
    fn adding_keywords_never_lowers_confidence() {
        let m = model();
        let base = rank(&report("cough", Some(70), Gender::Male), &m);
        let more = rank(&report("cough and chest pain", Some(70), Gender::Male), &m);
        let most = rank(
            &report("cough and chest pain with shortness of breath", Some(70), Gender::Male),
            &m,
        );
        assert!(base.confidence <= more.confidence);
        assert!(more.confidence <= most.confidence);
    }

    #[test]
    fn gender_skew_nudges_matching_gender_only() {
        let m = model();
        let male = rank(
            &report("chest pain and shortness of breath", Some(40), Gender::Male),
            &m,
        );
        let unknown = rank(
            &report("chest pain and shortness of breath", Some(40), Gender::Unknown),
            &m,
        );
        let male_acs = male
            .diagnoses
            .iter()
            .find(|d| d.condition == "acute coronary syndrome")
            .unwrap();
        let unknown_acs = unknown
            .diagnoses
            .iter()
            .find(|d| d.condition == "acute coronary syndrome")
            .unwrap();
        assert!(male_acs.confidence > unknown_acs.confidence);
        // Overall confidence stays gender-neutral
        assert_eq!(male.confidence, unknown.confidence);
    }

    #[test]
    fn high_candidates_produce_escalation_recommendations() {
        let assessment = rank(
            &report("chest pain and shortness of breath", Some(70), Gender::Male),
            &model(),
        );
        assert!(assessment.recommendations[0].contains("immediate"));
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("acute coronary syndrome")));
    }

    #[test]
    fn low_only_candidates_get_monitoring_guidance() {
        let assessment = rank(&report("mild nausea", Some(30), Gender::Female), &model());
        assert!(!assessment.diagnoses.is_empty());
        assert!(assessment.diagnoses.iter().all(|d| d.severity == Severity::Low));
        assert_eq!(assessment.recommendations.len(), 1);
        assert!(assessment.recommendations[0].contains("Monitor"));
    }

    #[test]
    fn unmatched_text_yields_no_candidates_but_general_guidance() {
        let assessment = rank(&report("sprained ankle", Some(30), Gender::Male), &model());
        assert!(assessment.diagnoses.is_empty());
        assert_eq!(assessment.confidence, 0.0);
        assert_eq!(assessment.recommendations.len(), 1);
    }
}
