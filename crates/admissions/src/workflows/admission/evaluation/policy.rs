use serde::{Deserialize, Serialize};

use super::super::domain::ScholarshipTier;
use super::config::AdmissionThresholds;

/// Final disposition of an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdmissionDecision {
    ScholarshipAwarded { tier: ScholarshipTier },
    Regular,
    ScholarshipRevoked,
    Rejected { reason: RejectionReason },
}

impl AdmissionDecision {
    pub fn summary(&self) -> String {
        match self {
            AdmissionDecision::ScholarshipAwarded { tier } => {
                format!("Accepted with {}% Scholarship", tier.percent())
            }
            AdmissionDecision::Regular => "Accepted Regular".to_string(),
            AdmissionDecision::ScholarshipRevoked => {
                "Accepted Regular (Scholarship Revoked)".to_string()
            }
            AdmissionDecision::Rejected { .. } => "Rejected".to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        !matches!(self, AdmissionDecision::Rejected { .. })
    }
}

/// Why an application stopped early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    MandatoryDocumentFailure,
    AcademicShortfall { score: f64, required: f64 },
    InsufficientActivities { count: u32, required: u32 },
    InterviewShortfall { score: f64, required: f64 },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::MandatoryDocumentFailure => "Mandatory Document Failure".to_string(),
            RejectionReason::AcademicShortfall { score, required } => {
                format!("Combined Percentage {score}% < {required}%")
            }
            RejectionReason::InsufficientActivities { count, required } => {
                format!("Activities Count {count} < {required}")
            }
            RejectionReason::InterviewShortfall { score, required } => {
                format!("Interview Score {score}% < {required}%")
            }
        }
    }
}

/// Decision for an interview that reached the pass mark.
///
/// A tentative scholarship survives only when both the interview and the recorded academic
/// percentage reach their scholarship floors.
pub(crate) fn decide_acceptance(
    interview_score: f64,
    academic_percentage: f64,
    tier: ScholarshipTier,
    thresholds: &AdmissionThresholds,
) -> AdmissionDecision {
    if !tier.is_awarded() {
        return AdmissionDecision::Regular;
    }

    if interview_score >= thresholds.interview_scholarship_floor
        && academic_percentage >= thresholds.academic_scholarship_floor
    {
        AdmissionDecision::ScholarshipAwarded { tier }
    } else {
        AdmissionDecision::ScholarshipRevoked
    }
}
