use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ScholarshipTier, Stage, TransitionResult};
use super::evaluation::ActivitiesPolicy;
use super::inputs::ApplicantData;
use super::session::{AdmissionSession, SessionSummary};

/// Identifier wrapper for admission sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Repository record holding one applicant's session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub session: AdmissionSession,
}

impl SessionRecord {
    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            created_at: self.created_at,
            activities_policy: self.session.config().activities_policy,
            stage: self.session.current_stage(),
            stage_label: self.session.current_stage().label(),
            scholarship_tier: self.session.scholarship_tier(),
            summary: self.session.summary(),
            applicant: self.session.applicant_data().clone(),
            history: self.session.history().to_vec(),
        }
    }
}

/// Storage abstraction so the service can be exercised without a backing store.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    /// Apply `change` to the stored record while holding exclusive access to it.
    fn modify(
        &self,
        id: &SessionId,
        change: &mut dyn FnMut(&mut SessionRecord),
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Exposed state of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub activities_policy: ActivitiesPolicy,
    pub stage: Stage,
    pub stage_label: &'static str,
    pub scholarship_tier: ScholarshipTier,
    pub summary: SessionSummary,
    #[serde(skip_serializing_if = "ApplicantData::is_empty")]
    pub applicant: ApplicantData,
    pub history: Vec<TransitionResult>,
}
