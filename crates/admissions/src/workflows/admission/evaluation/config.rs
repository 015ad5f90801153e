use serde::{Deserialize, Serialize};

use super::super::domain::ScholarshipTier;

/// How the activities stage treats applicants with few activities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitiesPolicy {
    /// Never rejects; every applicant proceeds to the interview.
    #[default]
    Lenient,
    /// Rejects applicants below `AdmissionThresholds::activities_minimum`.
    Strict,
}

impl ActivitiesPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

/// Minimum academic percentage that earns a scholarship tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThreshold {
    pub minimum_score: f64,
    pub tier: ScholarshipTier,
}

/// Pass marks, tier thresholds, and maximum marks used by the stage rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionThresholds {
    pub academic_pass: f64,
    pub scholarship_tiers: Vec<TierThreshold>,
    pub activities_minimum: u32,
    pub activity_bonus_points: u32,
    pub scholarship_cap: ScholarshipTier,
    pub interview_pass: f64,
    pub interview_scholarship_floor: f64,
    pub academic_scholarship_floor: f64,
    pub max_second_year_marks: f64,
    pub max_admission_test_marks: f64,
}

impl AdmissionThresholds {
    pub fn standard() -> Self {
        Self {
            academic_pass: 60.0,
            scholarship_tiers: vec![
                TierThreshold {
                    minimum_score: 90.0,
                    tier: ScholarshipTier::new(30),
                },
                TierThreshold {
                    minimum_score: 80.0,
                    tier: ScholarshipTier::new(20),
                },
                TierThreshold {
                    minimum_score: 70.0,
                    tier: ScholarshipTier::new(10),
                },
            ],
            activities_minimum: 2,
            activity_bonus_points: 5,
            scholarship_cap: ScholarshipTier::new(30),
            interview_pass: 50.0,
            interview_scholarship_floor: 70.0,
            academic_scholarship_floor: 70.0,
            max_second_year_marks: 1100.0,
            max_admission_test_marks: 100.0,
        }
    }

    pub fn total_max_marks(&self) -> f64 {
        self.max_second_year_marks + self.max_admission_test_marks
    }
}

impl Default for AdmissionThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rubric configuration handed to the decision engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub thresholds: AdmissionThresholds,
    pub activities_policy: ActivitiesPolicy,
}

impl EvaluationConfig {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn with_activities_policy(mut self, policy: ActivitiesPolicy) -> Self {
        self.activities_policy = policy;
        self
    }
}
