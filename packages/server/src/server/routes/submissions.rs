//! Submission routes - create, review listing, moderation decisions

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::{ApiError, SubmissionId};
use crate::domains::submissions::actions::{
    approve_submission, create_submission, get_submission, list_submissions, reject_submission,
    suggest_tags, ApproveRequest, CreateSubmissionRequest, RejectRequest,
};
use crate::domains::submissions::models::{Submission, SubmissionState};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: SubmissionId,
}

#[derive(Debug, Deserialize)]
pub struct ListSubmissionsQuery {
    pub state: Option<SubmissionState>,
}

#[derive(Serialize)]
pub struct TagSuggestionsResponse {
    pub suggestions: Vec<String>,
}

pub async fn create_submission_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let submission = create_submission(req, &auth.user, &state.db_pool).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: submission.id }),
    ))
}

/// Review queue listing; defaults to the pending state.
pub async fn list_submissions_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListSubmissionsQuery>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let wanted = query.state.unwrap_or(SubmissionState::Pending);
    let submissions = list_submissions(wanted, &auth.user, &state.db_pool).await?;
    Ok(Json(submissions))
}

pub async fn get_submission_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<SubmissionId>,
) -> Result<Json<Submission>, ApiError> {
    let submission = get_submission(id, &auth.user, &state.db_pool).await?;
    Ok(Json(submission))
}

pub async fn approve_submission_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<SubmissionId>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<Submission>, ApiError> {
    let submission = approve_submission(id, req, &auth.user, &state.db_pool).await?;
    Ok(Json(submission))
}

pub async fn reject_submission_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<SubmissionId>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<Submission>, ApiError> {
    let submission = reject_submission(id, req, &auth.user, &state.db_pool).await?;
    Ok(Json(submission))
}

pub async fn tag_suggestions_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<SubmissionId>,
) -> Result<Json<TagSuggestionsResponse>, ApiError> {
    let suggestions = suggest_tags(id, &auth.user, &state.db_pool).await?;
    Ok(Json(TagSuggestionsResponse { suggestions }))
}
