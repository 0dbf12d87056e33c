//! Submission handlers: submit, list, get, grade.
//!
//! Extractor rejections are taken as `Result` so they surface through
//! `ApiError` with the same JSON body as every other failure.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use gradebook_core::{GradebookError, NewSubmission, Submission, SubmissionFilter};

use crate::app_state::AppState;
use crate::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub grade: f64,
}

/// Ids that are not UUIDs cannot name a submission, so they are simply unknown.
fn parse_id(raw: &str) -> Result<Uuid, GradebookError> {
    raw.parse()
        .map_err(|_| GradebookError::NotFound(format!("assignment {raw} not found")))
}

pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<NewSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    let Json(input) = payload?;
    input.validate()?;

    let record = Submission::new(input, Uuid::new_v4(), Utc::now());
    state.store().insert(record.clone())?;

    tracing::info!(
        submission_id = %record.id,
        student_id = %record.student_id,
        assignment_type = %record.assignment_type,
        "submission recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<SubmissionFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Submission>>> {
    let Query(filter) = filter?;
    Ok(Json(state.store().list(&filter)))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Submission>> {
    let Path(id) = id?;
    let id = parse_id(&id)?;
    Ok(Json(state.store().get(&id)?))
}

pub async fn grade(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> ApiResult<Json<Submission>> {
    // Body problems are reported before the id is looked at.
    let Json(req) = payload?;
    let Path(id) = id?;
    let id = parse_id(&id)?;

    let record = state.store().update_grade(&id, req.grade)?;
    tracing::info!(submission_id = %record.id, grade = req.grade, "submission graded");
    Ok(Json(record))
}
