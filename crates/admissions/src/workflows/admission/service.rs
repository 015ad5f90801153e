use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::TransitionResult;
use super::evaluation::{DecisionEngine, EvaluationConfig, EvaluationError};
use super::inputs::StageInputs;
use super::repository::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use super::scenarios::{run_suite, standard_suite, ScenarioReport};
use super::session::AdmissionSession;

/// Service owning the shared engine and handing out one session per applicant.
pub struct AdmissionService<R> {
    repository: Arc<R>,
    engine: Arc<DecisionEngine>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("adm-{id:06}"))
}

impl<R> AdmissionService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EvaluationConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(DecisionEngine::new(config)),
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        self.engine.config()
    }

    /// Start a new application at the initial stage.
    pub fn open(&self) -> Result<SessionRecord, AdmissionServiceError> {
        let record = SessionRecord {
            session_id: next_session_id(),
            created_at: Utc::now(),
            session: AdmissionSession::with_engine(self.engine.clone()),
        };

        let stored = self.repository.insert(record)?;
        info!(session_id = %stored.session_id.0, "admission session opened");
        Ok(stored)
    }

    /// Submit inputs for the session's current stage.
    pub fn submit(
        &self,
        session_id: &SessionId,
        inputs: StageInputs,
    ) -> Result<TransitionResult, AdmissionServiceError> {
        self.apply(session_id, |session| session.submit_stage(inputs.clone()))
    }

    /// Submit raw form fields, read against whatever stage the session is in.
    pub fn submit_fields(
        &self,
        session_id: &SessionId,
        fields: &BTreeMap<String, String>,
    ) -> Result<TransitionResult, AdmissionServiceError> {
        self.apply(session_id, |session| {
            let inputs = StageInputs::from_fields(session.current_stage(), fields)?;
            session.submit_stage(inputs)
        })
    }

    fn apply<F>(
        &self,
        session_id: &SessionId,
        mut step: F,
    ) -> Result<TransitionResult, AdmissionServiceError>
    where
        F: FnMut(&mut AdmissionSession) -> Result<TransitionResult, EvaluationError>,
    {
        let mut outcome = None;
        self.repository.modify(session_id, &mut |record: &mut SessionRecord| {
            outcome = Some(step(&mut record.session));
        })?;

        match outcome {
            Some(Ok(result)) => Ok(result),
            Some(Err(error)) => {
                warn!(session_id = %session_id.0, %error, "submission rejected");
                Err(error.into())
            }
            None => Err(RepositoryError::NotFound.into()),
        }
    }

    pub fn reset(&self, session_id: &SessionId) -> Result<SessionRecord, AdmissionServiceError> {
        let mut reset = None;
        self.repository.modify(session_id, &mut |record: &mut SessionRecord| {
            record.session.reset();
            reset = Some(record.clone());
        })?;

        reset.ok_or_else(|| RepositoryError::NotFound.into())
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, AdmissionServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Run the built-in scenario suite against this service's configuration.
    pub fn scenarios(&self) -> ScenarioReport {
        run_suite(self.engine.config(), &standard_suite())
    }
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
