use super::common::*;
use crate::workflows::admission::domain::Stage;
use crate::workflows::admission::evaluation::EvaluationError;
use crate::workflows::admission::repository::{RepositoryError, SessionId, SessionRepository};
use crate::workflows::admission::service::AdmissionServiceError;
use crate::workflows::admission::AdmissionService;
use std::sync::Arc;

#[test]
fn open_assigns_distinct_session_ids() {
    let (service, repository) = build_service();

    let first = service.open().expect("first session");
    let second = service.open().expect("second session");

    assert_ne!(first.session_id, second.session_id);
    assert!(first.session_id.0.starts_with("adm-"));
    assert!(repository
        .fetch(&first.session_id)
        .expect("fetch succeeds")
        .is_some());
}

#[test]
fn submit_advances_only_the_targeted_session() {
    let (service, _) = build_service();
    let first = service.open().expect("first session");
    let second = service.open().expect("second session");

    service
        .submit(&first.session_id, docs(true))
        .expect("docs accepted");
    service
        .submit(&first.session_id, academic(1000.0, 80.0))
        .expect("academic accepted");

    let first = service.get(&first.session_id).expect("first stored");
    let second = service.get(&second.session_id).expect("second stored");
    assert_eq!(first.session.current_stage(), Stage::Activities);
    assert_eq!(first.session.scholarship_tier(), tier(30));
    assert_eq!(second.session.current_stage(), Stage::Docs);
}

#[test]
fn submit_propagates_terminal_stage_errors() {
    let (service, _) = build_service();
    let record = service.open().expect("session");
    service
        .submit(&record.session_id, docs(false))
        .expect("docs evaluated");

    match service.submit(&record.session_id, docs(true)) {
        Err(AdmissionServiceError::Evaluation(EvaluationError::TerminalStageTransition {
            stage,
        })) => assert_eq!(stage, Stage::Rejected),
        other => panic!("expected terminal stage error, got {other:?}"),
    }

    let stored = service.get(&record.session_id).expect("stored");
    assert_eq!(stored.session.history().len(), 1);
}

#[test]
fn submit_reports_missing_sessions() {
    let (service, _) = build_service();

    match service.submit(&SessionId("adm-missing".to_string()), docs(true)) {
        Err(AdmissionServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn reset_returns_fresh_state() {
    let (service, _) = build_service();
    let record = service.open().expect("session");
    service
        .submit(&record.session_id, docs(true))
        .expect("docs accepted");

    let reset = service.reset(&record.session_id).expect("reset");

    assert_eq!(reset.session_id, record.session_id);
    assert_eq!(reset.session.current_stage(), Stage::Docs);
    assert!(reset.session.history().is_empty());
}

#[test]
fn get_propagates_repository_outages() {
    let service = AdmissionService::new(Arc::new(UnavailableRepository), evaluation_config());

    match service.get(&SessionId("adm-000001".to_string())) {
        Err(AdmissionServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable error, got {other:?}"),
    }
}

#[test]
fn session_view_exposes_summary_and_history() {
    let (service, _) = build_service();
    let record = service.open().expect("session");
    service
        .submit(&record.session_id, docs(true))
        .expect("docs accepted");

    let view = service.get(&record.session_id).expect("stored").view();

    assert_eq!(view.stage, Stage::Academic);
    assert_eq!(view.stage_label, Stage::Academic.label());
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.summary.transitions, 1);
    assert_eq!(view.applicant.documents_verified, Some(true));
}

#[test]
fn scenarios_run_against_service_config() {
    let (service, _) = build_service();

    let report = service.scenarios();

    assert!(report.passed);
    assert!(report
        .results
        .iter()
        .any(|result| result.final_stage == Stage::Accepted));
}
