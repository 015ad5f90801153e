use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::evaluation::EvaluationError;
use super::inputs::StageInputs;
use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::service::{AdmissionService, AdmissionServiceError};

/// Router builder exposing HTTP endpoints for admission sessions.
pub fn admission_router<R>(service: Arc<AdmissionService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/admissions/sessions", post(open_handler::<R>))
        .route(
            "/api/v1/admissions/sessions/:session_id",
            get(status_handler::<R>),
        )
        .route(
            "/api/v1/admissions/sessions/:session_id/stages",
            post(submit_handler::<R>),
        )
        .route(
            "/api/v1/admissions/sessions/:session_id/form",
            post(form_handler::<R>),
        )
        .route(
            "/api/v1/admissions/sessions/:session_id/reset",
            post(reset_handler::<R>),
        )
        .route("/api/v1/admissions/scenarios", get(scenarios_handler::<R>))
        .with_state(service)
}

pub(crate) async fn open_handler<R>(State(service): State<Arc<AdmissionService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    match service.open() {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(inputs): axum::Json<StageInputs>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.submit(&SessionId(session_id), inputs) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Accepts the flat string fields of the stage forms, e.g. `{"documents_verified": "on"}`.
pub(crate) async fn form_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(fields): axum::Json<BTreeMap<String, String>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.submit_fields(&SessionId(session_id), &fields) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.reset(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scenarios_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.scenarios())).into_response()
}

fn error_response(error: AdmissionServiceError) -> Response {
    let status = match &error {
        AdmissionServiceError::Evaluation(EvaluationError::TerminalStageTransition { .. }) => {
            StatusCode::CONFLICT
        }
        AdmissionServiceError::Evaluation(
            EvaluationError::InvalidInput { .. } | EvaluationError::StageMismatch { .. },
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        AdmissionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AdmissionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AdmissionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": error_kind(&error),
    });
    (status, axum::Json(payload)).into_response()
}

fn error_kind(error: &AdmissionServiceError) -> &'static str {
    match error {
        AdmissionServiceError::Evaluation(EvaluationError::InvalidInput { .. }) => "invalid_input",
        AdmissionServiceError::Evaluation(EvaluationError::StageMismatch { .. }) => {
            "stage_mismatch"
        }
        AdmissionServiceError::Evaluation(EvaluationError::TerminalStageTransition { .. }) => {
            "terminal_stage"
        }
        AdmissionServiceError::Repository(RepositoryError::NotFound) => "not_found",
        AdmissionServiceError::Repository(RepositoryError::Conflict) => "conflict",
        AdmissionServiceError::Repository(RepositoryError::Unavailable(_)) => "unavailable",
    }
}
