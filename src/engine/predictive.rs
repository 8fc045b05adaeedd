use super::lexicon::{
    bed_days_factor, follow_up_visits, priority_multiplier, recovery_model, risk_base,
};
use super::scorer::{clamp_age, SymptomModel};
use super::types::{
    ComplicationsRisk, ConditionCategory, OutcomeProbabilities, PredictionInput, PredictionResult,
    RecoveryEstimate, ResourceNeeds, Severity,
};

/// Recovery-time age adjustment: days added per year outside the 5-60 band.
const DAYS_PER_YEAR_OVER_60: f64 = 0.1;
const DAYS_PER_YEAR_UNDER_5: f64 = 0.2;

/// Split of the complication probability across non-full outcomes.
const PARTIAL_SHARE: f64 = 0.6;
const CHRONIC_SHARE: f64 = 0.4;

/// Predict clinical outcomes for a symptom report.
///
/// Total over all inputs: missing symptom text classifies as `Other` and
/// every downstream value is computed from that category's neutral
/// constants.
pub fn predict(input: &PredictionInput, model: &dyn SymptomModel) -> PredictionResult {
    let category = model.classify(&input.symptoms);
    let symptom_score = model.score(&input.symptoms);
    let age = input.age.map(clamp_age);

    let recovery_time = estimate_recovery(category, age);
    let complications_risk = assess_risk(category, symptom_score, input);
    let resource_needs = estimate_resources(category, &recovery_time, &complications_risk);
    let outcome_probabilities = outcome_distribution(complications_risk.probability);

    PredictionResult {
        condition_type: category,
        recovery_time,
        complications_risk,
        resource_needs,
        outcome_probabilities,
    }
}

fn age_adjustment_days(age: Option<i64>) -> f64 {
    match age {
        Some(a) if a > 60 => (a - 60) as f64 * DAYS_PER_YEAR_OVER_60,
        Some(a) if a < 5 => (5 - a) as f64 * DAYS_PER_YEAR_UNDER_5,
        _ => 0.0,
    }
}

fn estimate_recovery(category: ConditionCategory, age: Option<i64>) -> RecoveryEstimate {
    let recovery = recovery_model(category);
    let estimated_days = recovery.base_days + age_adjustment_days(age);
    RecoveryEstimate {
        estimated_days,
        confidence: recovery.confidence,
        range_min: (estimated_days - recovery.variance_days).max(0.0),
        range_max: estimated_days + recovery.variance_days,
    }
}

fn assess_risk(
    category: ConditionCategory,
    symptom_score: f64,
    input: &PredictionInput,
) -> ComplicationsRisk {
    let probability = (symptom_score * risk_base(category) * priority_multiplier(input.priority))
        .clamp(0.0, 1.0);
    ComplicationsRisk {
        risk_level: Severity::from_confidence(probability),
        probability,
    }
}

fn estimate_resources(
    category: ConditionCategory,
    recovery: &RecoveryEstimate,
    risk: &ComplicationsRisk,
) -> ResourceNeeds {
    let bed_days = (recovery.estimated_days * bed_days_factor(category)).round() as i64;
    ResourceNeeds {
        bed_days: bed_days.max(0),
        specialist_required: risk.risk_level != Severity::Low,
        follow_up_visits: follow_up_visits(category, risk.risk_level),
    }
}

/// Allocate full/partial/chronic outcome weights from the complication
/// probability and renormalize so they sum to exactly 1.0.
fn outcome_distribution(probability: f64) -> OutcomeProbabilities {
    let full = 1.0 - probability;
    let partial = probability * PARTIAL_SHARE;
    let chronic = probability * CHRONIC_SHARE;
    let sum = full + partial + chronic;
    if sum <= 0.0 {
        return OutcomeProbabilities {
            full_recovery: 1.0,
            partial_recovery: 0.0,
            chronic_condition: 0.0,
        };
    }
    OutcomeProbabilities {
        full_recovery: full / sum,
        partial_recovery: partial / sum,
        chronic_condition: chronic / sum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lexicon::Lexicon;
    use crate::engine::scorer::KeywordModel;
    use crate::models::enums::{Gender, Priority};

    fn model() -> KeywordModel {
        KeywordModel::new(Lexicon::builtin())
    }

    fn input(symptoms: &str, age: Option<i64>, priority: Priority) -> PredictionInput {
        PredictionInput {
            symptoms: symptoms.to_string(),
            age,
            gender: Gender::Unknown,
            medical_history: None,
            priority,
        }
    }

    fn assert_probabilities_sum_to_one(p: &OutcomeProbabilities) {
        let sum = p.full_recovery + p.partial_recovery + p.chronic_condition;
        assert!((sum - 1.0).abs() < 1e-6, "sum was {sum}");
    }

    #[test]
    fn mild_cough_is_low_risk_respiratory() {
        let result = predict(&input("mild cough", Some(30), Priority::Low), &model());
        assert_eq!(result.condition_type, ConditionCategory::Respiratory);
        assert_ne!(result.complications_risk.risk_level, Severity::High);
        assert!(result.resource_needs.bed_days >= 0);
        assert_eq!(result.recovery_time.estimated_days, 7.0);
        assert_probabilities_sum_to_one(&result.outcome_probabilities);
    }

    #[test]
    fn empty_symptoms_defaults_to_other_category() {
        let result = predict(&input("", None, Priority::Medium), &model());
        assert_eq!(result.condition_type, ConditionCategory::Other);
        assert_eq!(result.recovery_time.estimated_days, 10.0);
        assert_eq!(result.complications_risk.probability, 0.0);
        assert_eq!(result.complications_risk.risk_level, Severity::Low);
        assert!(!result.resource_needs.specialist_required);
        assert_probabilities_sum_to_one(&result.outcome_probabilities);
    }

    #[test]
    fn recovery_confidence_is_per_category_constant() {
        let m = model();
        let young = predict(&input("mild cough", Some(20), Priority::Low), &m);
        let old = predict(&input("severe cough and wheezing", Some(80), Priority::High), &m);
        assert_eq!(young.recovery_time.confidence, 0.70);
        assert_eq!(old.recovery_time.confidence, 0.70);
    }

    #[test]
    fn age_extends_recovery_linearly() {
        let m = model();
        let base = predict(&input("cough", Some(40), Priority::Medium), &m);
        let seventy = predict(&input("cough", Some(70), Priority::Medium), &m);
        let toddler = predict(&input("cough", Some(2), Priority::Medium), &m);
        assert_eq!(base.recovery_time.estimated_days, 7.0);
        assert!((seventy.recovery_time.estimated_days - 8.0).abs() < 1e-9);
        assert!((toddler.recovery_time.estimated_days - 7.6).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_age_is_clamped() {
        let m = model();
        let absurd = predict(&input("cough", Some(4000), Priority::Medium), &m);
        let capped = predict(&input("cough", Some(120), Priority::Medium), &m);
        assert_eq!(
            absurd.recovery_time.estimated_days,
            capped.recovery_time.estimated_days
        );

        let negative = predict(&input("cough", Some(-3), Priority::Medium), &m);
        let newborn = predict(&input("cough", Some(0), Priority::Medium), &m);
        assert_eq!(
            negative.recovery_time.estimated_days,
            newborn.recovery_time.estimated_days
        );
    }

    #[test]
    fn cardiac_presentation_raises_risk_with_priority() {
        let m = model();
        let low = predict(
            &input("chest pain and shortness of breath", Some(70), Priority::Low),
            &m,
        );
        let high = predict(
            &input("chest pain and shortness of breath", Some(70), Priority::High),
            &m,
        );
        assert_eq!(low.condition_type, ConditionCategory::Cardiac);
        assert!(high.complications_risk.probability > low.complications_risk.probability);
        assert_probabilities_sum_to_one(&high.outcome_probabilities);
    }

    #[test]
    fn probability_is_clamped_to_unit_interval() {
        let everything =
            "chest pain shortness of breath seizure cough fever headache dizziness confusion wheezing nausea";
        let result = predict(&input(everything, Some(80), Priority::High), &model());
        assert!((0.0..=1.0).contains(&result.complications_risk.probability));
        assert_probabilities_sum_to_one(&result.outcome_probabilities);
    }

    #[test]
    fn specialist_follows_risk_level() {
        let m = model();
        let benign = predict(&input("mild cough", Some(30), Priority::Low), &m);
        assert_eq!(
            benign.resource_needs.specialist_required,
            benign.complications_risk.risk_level != Severity::Low
        );

        let severe = predict(
            &input("chest pain and shortness of breath", Some(80), Priority::High),
            &m,
        );
        assert_eq!(
            severe.resource_needs.specialist_required,
            severe.complications_risk.risk_level != Severity::Low
        );
    }

    #[test]
    fn bed_days_derive_from_recovery_estimate() {
        let result = predict(&input("cough and fever", Some(40), Priority::Medium), &model());
        // Respiratory: 7.0 days * 0.3 factor, rounded
        assert_eq!(result.resource_needs.bed_days, 2);
    }

    #[test]
    fn follow_up_visits_present_for_every_category() {
        let m = model();
        for symptoms in ["cough", "chest pain", "headache", "no match at all"] {
            let result = predict(&input(symptoms, Some(50), Priority::Medium), &m);
            assert!(result.resource_needs.follow_up_visits >= 1);
        }
    }

    #[test]
    fn higher_risk_shifts_outcomes_away_from_full_recovery() {
        let m = model();
        let mild = predict(&input("mild cough", Some(30), Priority::Low), &m);
        let severe = predict(
            &input("chest pain and shortness of breath", Some(80), Priority::High),
            &m,
        );
        assert!(
            severe.outcome_probabilities.full_recovery < mild.outcome_probabilities.full_recovery
        );
        assert!(
            severe.outcome_probabilities.chronic_condition
                > mild.outcome_probabilities.chronic_condition
        );
    }

    #[test]
    fn deterministic_for_identical_input() {
        let m = model();
        let i = input("fever and headache", Some(66), Priority::High);
        let a = predict(&i, &m);
        let b = predict(&i, &m);
        assert_eq!(a.condition_type, b.condition_type);
        assert_eq!(a.recovery_time.estimated_days, b.recovery_time.estimated_days);
        assert_eq!(
            a.complications_risk.probability,
            b.complications_risk.probability
        );
        assert_eq!(
            a.outcome_probabilities.full_recovery,
            b.outcome_probabilities.full_recovery
        );
    }

    #[test]
    fn recovery_range_brackets_the_estimate() {
        let result = predict(&input("headache and dizziness", Some(70), Priority::Medium), &model());
        assert_eq!(result.condition_type, ConditionCategory::Neurological);
        assert!(result.recovery_time.range_min <= result.recovery_time.estimated_days);
        assert!(result.recovery_time.range_max >= result.recovery_time.estimated_days);
        assert!(result.recovery_time.range_min >= 0.0);
    }
}
