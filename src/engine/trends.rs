use serde::{Deserialize, Serialize};

/// Case counts for one month of the reference season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalPattern {
    pub month: String,
    pub respiratory_cases: u32,
    pub flu_cases: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeGroupInsight {
    pub range: String,
    pub high_risk_conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicInsights {
    pub age_groups: Vec<AgeGroupInsight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthTrends {
    pub seasonal_patterns: Vec<SeasonalPattern>,
    pub demographic_insights: DemographicInsights,
}

/// Fixed reference summary consumed by the predictive dashboard page.
/// Assembled from curated example data; identical on every call.
pub fn report() -> HealthTrends {
    let seasonal = [
        ("January", 45, 32),
        ("February", 38, 28),
        ("March", 25, 15),
        ("April", 18, 8),
        ("May", 12, 5),
    ];
    let age_groups = [
        ("0-18", vec!["Asthma", "Allergies"]),
        ("19-35", vec!["Stress-related", "Sports injuries"]),
        ("36-60", vec!["Hypertension", "Diabetes"]),
        ("60+", vec!["Cardiovascular", "Respiratory"]),
    ];

    HealthTrends {
        seasonal_patterns: seasonal
            .into_iter()
            .map(|(month, respiratory_cases, flu_cases)| SeasonalPattern {
                month: month.to_string(),
                respiratory_cases,
                flu_cases,
            })
            .collect(),
        demographic_insights: DemographicInsights {
            age_groups: age_groups
                .into_iter()
                .map(|(range, conditions)| AgeGroupInsight {
                    range: range.to_string(),
                    high_risk_conditions: conditions.into_iter().map(String::from).collect(),
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_patterns_are_non_empty() {
        let trends = report();
        assert!(!trends.seasonal_patterns.is_empty());
        assert_eq!(trends.seasonal_patterns[0].month, "January");
    }

    #[test]
    fn demographic_age_groups_are_non_empty() {
        let trends = report();
        assert!(!trends.demographic_insights.age_groups.is_empty());
        assert!(trends
            .demographic_insights
            .age_groups
            .iter()
            .all(|g| !g.high_risk_conditions.is_empty()));
    }

    #[test]
    fn identical_on_every_call() {
        let a = serde_json::to_value(report()).unwrap();
        let b = serde_json::to_value(report()).unwrap();
        assert_eq!(a, b);
    }
}
