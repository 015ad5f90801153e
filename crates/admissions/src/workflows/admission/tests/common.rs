use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::admission::domain::{ScholarshipTier, Stage, TransitionResult};
use crate::workflows::admission::evaluation::{DecisionEngine, EvaluationConfig};
use crate::workflows::admission::inputs::StageInputs;
use crate::workflows::admission::repository::{
    RepositoryError, SessionId, SessionRecord, SessionRepository,
};
use crate::workflows::admission::{admission_router, AdmissionService};

pub(super) fn evaluation_config() -> EvaluationConfig {
    EvaluationConfig::standard()
}

pub(super) fn decision_engine() -> DecisionEngine {
    DecisionEngine::new(evaluation_config())
}

pub(super) fn docs(documents_verified: bool) -> StageInputs {
    StageInputs::Docs { documents_verified }
}

pub(super) fn academic(marks_second_year: f64, marks_admission_test: f64) -> StageInputs {
    StageInputs::Academic {
        marks_second_year,
        marks_admission_test,
    }
}

pub(super) fn activities(activity_count: u32) -> StageInputs {
    StageInputs::Activities { activity_count }
}

pub(super) fn interview(interview_percentage: f64) -> StageInputs {
    StageInputs::Interview {
        interview_percentage,
    }
}

pub(super) fn tier(percent: u8) -> ScholarshipTier {
    ScholarshipTier::new(percent)
}

/// History as it would look after a passed academic stage with `score`.
pub(super) fn history_with_academic(score: f64) -> Vec<TransitionResult> {
    vec![
        TransitionResult {
            from_stage: Stage::Docs,
            next_stage: Stage::Academic,
            outcome: "Documents Verified".to_string(),
            condition: "All Mandatory Documents Validated".to_string(),
            stage_score: 0.0,
            decision: None,
        },
        TransitionResult {
            from_stage: Stage::Academic,
            next_stage: Stage::Activities,
            outcome: format!("Academic Pass (Score: {score}%)"),
            condition: String::new(),
            stage_score: score,
            decision: None,
        },
        TransitionResult {
            from_stage: Stage::Activities,
            next_stage: Stage::Interview,
            outcome: "Activities Pass (Count: 3)".to_string(),
            condition: String::new(),
            stage_score: 100.0,
            decision: None,
        },
    ]
}

pub(super) fn build_service() -> (AdmissionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AdmissionService::new(repository.clone(), evaluation_config());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn modify(
        &self,
        id: &SessionId,
        change: &mut dyn FnMut(&mut SessionRecord),
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl SessionRepository for ConflictRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(None)
    }

    fn modify(
        &self,
        _id: &SessionId,
        _change: &mut dyn FnMut(&mut SessionRecord),
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify(
        &self,
        _id: &SessionId,
        _change: &mut dyn FnMut(&mut SessionRecord),
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn admission_router_with_service(
    service: AdmissionService<MemoryRepository>,
) -> axum::Router {
    admission_router(Arc::new(service))
}
