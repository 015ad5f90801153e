use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{ScholarshipTier, Stage, TransitionResult};
use super::evaluation::{AdmissionDecision, DecisionEngine, EvaluationConfig, EvaluationError};
use super::inputs::{ApplicantData, StageInputs};
use super::script::ApplicantScript;

/// State for one applicant moving through the admission stages.
///
/// Each applicant gets their own session; nothing is shared between sessions apart from the
/// read-only engine.
#[derive(Debug, Clone)]
pub struct AdmissionSession {
    engine: Arc<DecisionEngine>,
    stage: Stage,
    history: Vec<TransitionResult>,
    applicant: ApplicantData,
    scholarship_tier: ScholarshipTier,
}

impl AdmissionSession {
    pub fn new(config: EvaluationConfig) -> Self {
        Self::with_engine(Arc::new(DecisionEngine::new(config)))
    }

    pub fn with_engine(engine: Arc<DecisionEngine>) -> Self {
        Self {
            engine,
            stage: Stage::INITIAL,
            history: Vec::new(),
            applicant: ApplicantData::default(),
            scholarship_tier: ScholarshipTier::NONE,
        }
    }

    /// Evaluate the current stage and advance. On error the session is left untouched.
    pub fn submit_stage(
        &mut self,
        inputs: StageInputs,
    ) -> Result<TransitionResult, EvaluationError> {
        let from = self.stage;
        let evaluation = self
            .engine
            .evaluate(from, &inputs, self.scholarship_tier, &self.history)
            .map_err(|error| {
                debug!(stage = %from, %error, "stage submission refused");
                error
            })?;

        let result = evaluation.result;
        debug!(
            from = %result.from_stage,
            to = %result.next_stage,
            score = result.stage_score,
            tier = evaluation.scholarship_tier.percent(),
            "stage evaluated"
        );
        if result.is_terminal() {
            info!(
                outcome = %result.outcome,
                tier = evaluation.scholarship_tier.percent(),
                "admission decided"
            );
        }

        self.stage = result.next_stage;
        self.scholarship_tier = evaluation.scholarship_tier;
        self.applicant.absorb(&inputs);
        self.history.push(result.clone());

        Ok(result)
    }

    /// Return to the initial stage with no history, data or tier.
    pub fn reset(&mut self) {
        self.stage = Stage::INITIAL;
        self.history.clear();
        self.applicant = ApplicantData::default();
        self.scholarship_tier = ScholarshipTier::NONE;
    }

    /// Feed stages from `script` until the session finishes or the script has no inputs for
    /// the current stage. Returns the stage the session stopped in.
    pub fn run_script(&mut self, script: &ApplicantScript) -> Result<Stage, EvaluationError> {
        while !self.stage.is_terminal() {
            match script.inputs_for(self.stage)? {
                Some(inputs) => {
                    self.submit_stage(inputs)?;
                }
                None => break,
            }
        }
        Ok(self.stage)
    }

    pub fn current_stage(&self) -> Stage {
        self.stage
    }

    pub fn history(&self) -> &[TransitionResult] {
        &self.history
    }

    pub fn scholarship_tier(&self) -> ScholarshipTier {
        self.scholarship_tier
    }

    pub fn applicant_data(&self) -> &ApplicantData {
        &self.applicant
    }

    pub fn config(&self) -> &EvaluationConfig {
        self.engine.config()
    }

    pub fn is_finished(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn decision(&self) -> Option<&AdmissionDecision> {
        self.history
            .last()
            .filter(|entry| entry.is_terminal())
            .and_then(|entry| entry.decision.as_ref())
    }

    /// Stages visited so far, starting with the initial stage.
    pub fn path(&self) -> Vec<Stage> {
        let mut path = vec![Stage::INITIAL];
        path.extend(self.history.iter().map(|entry| entry.next_stage));
        path
    }

    pub fn summary(&self) -> SessionSummary {
        let score_from = |stage: Stage| {
            self.history
                .iter()
                .find(|entry| entry.from_stage == stage)
                .map(|entry| entry.stage_score)
        };

        SessionSummary {
            stage: self.stage,
            stage_label: self.stage.label(),
            finished: self.is_finished(),
            decision: self.decision().map(AdmissionDecision::summary),
            scholarship_tier: self.scholarship_tier,
            academic_percentage: score_from(Stage::Academic),
            interview_percentage: score_from(Stage::Interview),
            transitions: self.history.len(),
        }
    }
}

impl Default for AdmissionSession {
    fn default() -> Self {
        Self::new(EvaluationConfig::standard())
    }
}

/// Results dashboard data for a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub stage: Stage,
    pub stage_label: &'static str,
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    pub scholarship_tier: ScholarshipTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_percentage: Option<f64>,
    pub transitions: usize,
}
