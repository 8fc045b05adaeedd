use super::types::Severity;

/// Recommendation template builder. Wording is fixed so identical inputs
/// always produce identical guidance.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Returned alone when a report carries no symptom text.
    pub fn request_details() -> String {
        "Please provide a description of the patient's symptoms to run an assessment.".to_string()
    }

    /// General guidance keyed by the highest severity tier present.
    pub fn tier_guidance(tier: Severity) -> String {
        match tier {
            Severity::High => {
                "Seek immediate clinical evaluation and notify the attending physician."
                    .to_string()
            }
            Severity::Medium => {
                "Schedule a follow-up assessment within 24-48 hours and monitor for changes."
                    .to_string()
            }
            Severity::Low => {
                "Monitor symptoms, encourage rest, and advise the patient to return if symptoms worsen."
                    .to_string()
            }
        }
    }

    /// Condition-specific recommendation for a High or Medium candidate.
    pub fn condition_followup(condition: &str, severity: Severity) -> String {
        match severity {
            Severity::High => {
                format!("Escalate for urgent review: presentation is consistent with {condition}.")
            }
            _ => format!("Assess further for possible {condition} during follow-up."),
        }
    }

    /// Shown with every diagnostic response.
    pub fn diagnostic_disclaimer() -> &'static str {
        "This analysis is informational and does not replace professional medical diagnosis."
    }

    /// Shown with every predictive response.
    pub fn predictive_disclaimer() -> &'static str {
        "These estimates come from statistical heuristics and should support, not replace, clinical judgment."
    }
}
