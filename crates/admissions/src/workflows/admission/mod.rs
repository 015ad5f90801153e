//! Staged admission evaluation: a decision engine for each stage, sessions that carry an
//! applicant through the stages, and the service/router pair that exposes sessions over HTTP.

pub mod domain;
pub(crate) mod evaluation;
pub mod import;
pub mod inputs;
pub mod repository;
pub mod router;
pub mod scenarios;
pub mod script;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{ScholarshipTier, Stage, TransitionResult};
pub use evaluation::{
    ActivitiesPolicy, AdmissionDecision, AdmissionThresholds, DecisionEngine, Evaluation,
    EvaluationConfig, EvaluationError, RejectionReason, TierThreshold,
};
pub use import::{evaluate_batch, BatchImportError, BatchImporter, BatchOutcome, ImportedApplicant};
pub use inputs::{ApplicantData, StageInputs};
pub use repository::{RepositoryError, SessionId, SessionRecord, SessionRepository, SessionView};
pub use router::admission_router;
pub use scenarios::{
    run_suite, standard_suite, ExpectedDisposition, ScenarioCase, ScenarioReport, ScenarioResult,
};
pub use script::ApplicantScript;
pub use service::{AdmissionService, AdmissionServiceError};
pub use session::{AdmissionSession, SessionSummary};
