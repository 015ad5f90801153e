use super::common::*;
use crate::workflows::admission::domain::{ScholarshipTier, Stage};
use crate::workflows::admission::evaluation::{AdmissionDecision, EvaluationError};
use crate::workflows::admission::script::ApplicantScript;
use crate::workflows::admission::session::AdmissionSession;

fn session() -> AdmissionSession {
    AdmissionSession::new(evaluation_config())
}

fn assert_chained(session: &AdmissionSession) {
    let history = session.history();
    if let Some(first) = history.first() {
        assert_eq!(first.from_stage, Stage::INITIAL);
    }
    for pair in history.windows(2) {
        assert_eq!(pair[1].from_stage, pair[0].next_stage);
    }
}

#[test]
fn new_session_starts_at_documents() {
    let session = session();

    assert_eq!(session.current_stage(), Stage::Docs);
    assert!(session.history().is_empty());
    assert_eq!(session.scholarship_tier(), ScholarshipTier::NONE);
    assert!(session.applicant_data().is_empty());
    assert!(session.decision().is_none());
}

#[test]
fn full_scholarship_path_is_accepted() {
    let mut session = session();

    session.submit_stage(docs(true)).expect("docs");
    session.submit_stage(academic(1000.0, 80.0)).expect("academic");
    session.submit_stage(activities(3)).expect("activities");
    let last = session.submit_stage(interview(90.0)).expect("interview");

    assert_eq!(session.current_stage(), Stage::Accepted);
    assert_eq!(session.scholarship_tier(), tier(30));
    assert!(last.outcome.contains("Scholarship"));
    assert_eq!(session.history().len(), 4);
    assert_chained(&session);
    assert_eq!(
        session.path(),
        vec![
            Stage::Docs,
            Stage::Academic,
            Stage::Activities,
            Stage::Interview,
            Stage::Accepted
        ]
    );
}

#[test]
fn rejection_ends_history() {
    let mut session = session();

    session.submit_stage(docs(true)).expect("docs");
    session.submit_stage(academic(500.0, 100.0)).expect("academic");

    let last = session.history().last().expect("history entry");
    assert_eq!(last.next_stage, Stage::Rejected);
    assert_eq!(session.history().len(), 2);
    assert!(session.is_finished());

    let before = session.history().to_vec();
    match session.submit_stage(activities(3)) {
        Err(EvaluationError::TerminalStageTransition { stage }) => {
            assert_eq!(stage, Stage::Rejected)
        }
        other => panic!("expected terminal stage error, got {other:?}"),
    }
    assert_eq!(session.history(), before.as_slice());
}

#[test]
fn terminal_submissions_leave_state_untouched() {
    let mut session = session();
    session
        .run_script(
            &ApplicantScript::new()
                .documents(true)
                .academic(1000.0, 80.0)
                .activities(3)
                .interview(90.0),
        )
        .expect("script runs");

    let history = session.history().to_vec();
    let applicant = session.applicant_data().clone();

    for inputs in [docs(true), interview(99.0)] {
        assert!(matches!(
            session.submit_stage(inputs),
            Err(EvaluationError::TerminalStageTransition { .. })
        ));
    }

    assert_eq!(session.current_stage(), Stage::Accepted);
    assert_eq!(session.scholarship_tier(), tier(30));
    assert_eq!(session.history(), history.as_slice());
    assert_eq!(session.applicant_data(), &applicant);
}

#[test]
fn mismatched_inputs_do_not_advance() {
    let mut session = session();

    match session.submit_stage(academic(1000.0, 80.0)) {
        Err(EvaluationError::StageMismatch { stage, supplied }) => {
            assert_eq!(stage, Stage::Docs);
            assert_eq!(supplied, Stage::Academic);
        }
        other => panic!("expected stage mismatch, got {other:?}"),
    }

    assert_eq!(session.current_stage(), Stage::Docs);
    assert!(session.history().is_empty());
    assert!(session.applicant_data().is_empty());
}

#[test]
fn invalid_inputs_do_not_advance() {
    let mut session = session();
    session.submit_stage(docs(true)).expect("docs");

    assert!(matches!(
        session.submit_stage(academic(f64::NAN, 80.0)),
        Err(EvaluationError::InvalidInput { .. })
    ));
    assert_eq!(session.current_stage(), Stage::Academic);
    assert_eq!(session.history().len(), 1);
    assert!(session.applicant_data().marks_second_year.is_none());
}

#[test]
fn reset_is_idempotent() {
    let mut session = session();
    session.submit_stage(docs(true)).expect("docs");
    session.submit_stage(academic(1000.0, 80.0)).expect("academic");

    session.reset();
    let once = (
        session.current_stage(),
        session.history().to_vec(),
        session.scholarship_tier(),
        session.applicant_data().clone(),
    );
    session.reset();
    let twice = (
        session.current_stage(),
        session.history().to_vec(),
        session.scholarship_tier(),
        session.applicant_data().clone(),
    );

    assert_eq!(once, twice);
    assert_eq!(once.0, Stage::Docs);
    assert!(once.1.is_empty());
    assert_eq!(once.2, ScholarshipTier::NONE);
}

#[test]
fn reset_reopens_a_finished_session() {
    let mut session = session();
    session.submit_stage(docs(false)).expect("docs");
    assert!(session.is_finished());

    session.reset();
    let result = session.submit_stage(docs(true)).expect("docs after reset");

    assert_eq!(result.next_stage, Stage::Academic);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn applicant_data_merges_each_stage() {
    let mut session = session();
    session.submit_stage(docs(true)).expect("docs");
    session.submit_stage(academic(900.0, 80.0)).expect("academic");

    let data = session.applicant_data();
    assert_eq!(data.documents_verified, Some(true));
    assert_eq!(data.marks_second_year, Some(900.0));
    assert_eq!(data.marks_admission_test, Some(80.0));
    assert!(data.activity_count.is_none());
}

#[test]
fn revoked_scholarship_shows_in_summary() {
    let mut session = session();
    let stopped = session
        .run_script(
            &ApplicantScript::new()
                .documents(true)
                .academic(900.0, 80.0)
                .activities(3)
                .interview(60.0),
        )
        .expect("script runs");

    assert_eq!(stopped, Stage::Accepted);
    assert_eq!(
        session.decision(),
        Some(&AdmissionDecision::ScholarshipRevoked)
    );

    let summary = session.summary();
    assert!(summary.finished);
    assert_eq!(summary.academic_percentage, Some(82.0));
    assert_eq!(summary.interview_percentage, Some(60.0));
    assert_eq!(summary.scholarship_tier, ScholarshipTier::NONE);
    assert_eq!(
        summary.decision.as_deref(),
        Some("Accepted Regular (Scholarship Revoked)")
    );
}

#[test]
fn run_script_stops_where_inputs_run_out() {
    let mut session = session();

    let stopped = session
        .run_script(&ApplicantScript::new().documents(true).academic(1000.0, 80.0))
        .expect("script runs");

    assert_eq!(stopped, Stage::Activities);
    assert_eq!(session.scholarship_tier(), tier(30));
    assert!(!session.summary().finished);
}

#[test]
fn run_script_requires_both_academic_marks() {
    let mut session = session();
    let script = ApplicantScript {
        documents_verified: Some(true),
        marks_second_year: Some(1000.0),
        ..ApplicantScript::default()
    };

    assert!(matches!(
        session.run_script(&script),
        Err(EvaluationError::InvalidInput {
            field: "marks_admission_test",
            ..
        })
    ));
    assert_eq!(session.current_stage(), Stage::Academic);
}

#[test]
fn sessions_do_not_share_state() {
    let mut first = session();
    let second = session();

    first.submit_stage(docs(true)).expect("docs");
    first.submit_stage(academic(1000.0, 80.0)).expect("academic");

    assert_eq!(second.current_stage(), Stage::Docs);
    assert_eq!(second.scholarship_tier(), ScholarshipTier::NONE);
}
