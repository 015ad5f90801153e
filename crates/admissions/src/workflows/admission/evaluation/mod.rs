mod config;
mod policy;
mod rules;

pub use config::{ActivitiesPolicy, AdmissionThresholds, EvaluationConfig, TierThreshold};
pub use policy::{AdmissionDecision, RejectionReason};

use super::domain::{ScholarshipTier, Stage, TransitionResult};
use super::inputs::StageInputs;
use policy::decide_acceptance;

/// Stateless evaluator for a single stage. The scholarship tier is passed in and handed
/// back; the engine never touches session history.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: EvaluationConfig,
}

/// Transition produced by the engine together with the tier to carry forward.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: TransitionResult,
    pub scholarship_tier: ScholarshipTier,
}

impl DecisionEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        stage: Stage,
        inputs: &StageInputs,
        scholarship_tier: ScholarshipTier,
        prior_history: &[TransitionResult],
    ) -> Result<Evaluation, EvaluationError> {
        if stage.is_terminal() {
            return Err(EvaluationError::TerminalStageTransition { stage });
        }
        if inputs.stage() != stage {
            return Err(EvaluationError::StageMismatch {
                stage,
                supplied: inputs.stage(),
            });
        }
        inputs.validate()?;

        let evaluation = match *inputs {
            StageInputs::Docs { documents_verified } => self.documents(documents_verified),
            StageInputs::Academic {
                marks_second_year,
                marks_admission_test,
            } => self.academic(marks_second_year, marks_admission_test, scholarship_tier),
            StageInputs::Activities { activity_count } => {
                self.activities(activity_count, scholarship_tier)
            }
            StageInputs::Interview {
                interview_percentage,
            } => self.interview(interview_percentage, scholarship_tier, prior_history),
        };

        Ok(evaluation)
    }

    fn documents(&self, documents_verified: bool) -> Evaluation {
        // a new application starts here, so any tier from an earlier run is dropped
        let scholarship_tier = ScholarshipTier::NONE;

        let result = if documents_verified {
            advance(
                Stage::Docs,
                Stage::Academic,
                "Documents Verified".to_string(),
                "All Mandatory Documents Validated".to_string(),
                0.0,
            )
        } else {
            reject(Stage::Docs, RejectionReason::MandatoryDocumentFailure, 0.0)
        };

        Evaluation {
            result,
            scholarship_tier,
        }
    }

    fn academic(
        &self,
        marks_second_year: f64,
        marks_admission_test: f64,
        scholarship_tier: ScholarshipTier,
    ) -> Evaluation {
        let thresholds = &self.config.thresholds;
        let score = rules::academic_percentage(marks_second_year, marks_admission_test, thresholds);

        if score < thresholds.academic_pass {
            let reason = RejectionReason::AcademicShortfall {
                score,
                required: thresholds.academic_pass,
            };
            return Evaluation {
                result: reject(Stage::Academic, reason, score),
                scholarship_tier: ScholarshipTier::NONE,
            };
        }

        let tier = rules::tier_for_score(score, thresholds);
        Evaluation {
            result: advance(
                Stage::Academic,
                Stage::Activities,
                format!("Academic Pass (Score: {score}%)"),
                format!(
                    "Combined Percentage {score}% >= {}% (Scholarship Tentative: {}%)",
                    thresholds.academic_pass,
                    tier.percent()
                ),
                score,
            ),
            scholarship_tier: tier,
        }
    }

    fn activities(&self, activity_count: u32, scholarship_tier: ScholarshipTier) -> Evaluation {
        let thresholds = &self.config.thresholds;

        if self.config.activities_policy == ActivitiesPolicy::Strict
            && activity_count < thresholds.activities_minimum
        {
            let reason = RejectionReason::InsufficientActivities {
                count: activity_count,
                required: thresholds.activities_minimum,
            };
            return Evaluation {
                result: reject(Stage::Activities, reason, 0.0),
                scholarship_tier: ScholarshipTier::NONE,
            };
        }

        let boosted = rules::activity_bonus(scholarship_tier, activity_count, thresholds);
        let condition = if boosted != scholarship_tier {
            format!(
                "{activity_count} activities raised the tentative scholarship from {}% to {}%",
                scholarship_tier.percent(),
                boosted.percent()
            )
        } else {
            match self.config.activities_policy {
                ActivitiesPolicy::Strict => format!(
                    "Activities Count {activity_count} >= {}",
                    thresholds.activities_minimum
                ),
                ActivitiesPolicy::Lenient => {
                    format!("Activities Count {activity_count} recorded")
                }
            }
        };

        Evaluation {
            result: advance(
                Stage::Activities,
                Stage::Interview,
                format!("Activities Pass (Count: {activity_count})"),
                condition,
                rules::COMPLETED_STAGE_SCORE,
            ),
            scholarship_tier: boosted,
        }
    }

    fn interview(
        &self,
        score: f64,
        scholarship_tier: ScholarshipTier,
        prior_history: &[TransitionResult],
    ) -> Evaluation {
        let thresholds = &self.config.thresholds;

        if score < thresholds.interview_pass {
            let reason = RejectionReason::InterviewShortfall {
                score,
                required: thresholds.interview_pass,
            };
            return Evaluation {
                result: reject(Stage::Interview, reason, score),
                scholarship_tier: ScholarshipTier::NONE,
            };
        }

        let academic_percentage = rules::recorded_academic_percentage(prior_history);
        let decision = decide_acceptance(score, academic_percentage, scholarship_tier, thresholds);

        let (condition, scholarship_tier) = match &decision {
            AdmissionDecision::ScholarshipAwarded { tier } => (
                format!("Interview Pass ({score}%) and Scholarship Confirmed."),
                *tier,
            ),
            AdmissionDecision::ScholarshipRevoked => (
                format!("Interview Pass ({score}%), but Scholarship criteria not maintained."),
                ScholarshipTier::NONE,
            ),
            AdmissionDecision::Regular | AdmissionDecision::Rejected { .. } => (
                format!("Interview Pass ({score}%) and Regular Acceptance Granted."),
                ScholarshipTier::NONE,
            ),
        };

        Evaluation {
            result: TransitionResult {
                from_stage: Stage::Interview,
                next_stage: Stage::Accepted,
                outcome: decision.summary(),
                condition,
                stage_score: score,
                decision: Some(decision),
            },
            scholarship_tier,
        }
    }
}

fn advance(
    from_stage: Stage,
    next_stage: Stage,
    outcome: String,
    condition: String,
    stage_score: f64,
) -> TransitionResult {
    TransitionResult {
        from_stage,
        next_stage,
        outcome,
        condition,
        stage_score,
        decision: None,
    }
}

fn reject(from_stage: Stage, reason: RejectionReason, stage_score: f64) -> TransitionResult {
    let condition = reason.summary();
    let decision = AdmissionDecision::Rejected { reason };

    TransitionResult {
        from_stage,
        next_stage: Stage::Rejected,
        outcome: decision.summary(),
        condition,
        stage_score,
        decision: Some(decision),
    }
}

/// Errors surfaced to the caller without any state change.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("stage {stage} is terminal and accepts no further submissions")]
    TerminalStageTransition { stage: Stage },
    #[error("inputs for {supplied} were submitted while the application is at {stage}")]
    StageMismatch { stage: Stage, supplied: Stage },
}

impl EvaluationError {
    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
