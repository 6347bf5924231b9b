//! Theme routes - the public face of approved submissions

use axum::extract::{Extension, Path};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::common::{ApiError, SubmissionId, UserId};
use crate::domains::submissions::models::{Submission, SubmissionState, ValidatedUser};
use crate::server::app::AppState;

/// Published shape of an approved submission. Moderation internals
/// (state, moderator, reason, raw contributor ids) stay off this surface.
#[derive(Debug, Serialize)]
pub struct ThemeRecord {
    pub id: SubmissionId,
    pub title: String,
    pub description: String,
    pub preview_image: String,
    pub source_link: String,
    pub tags: Vec<String>,
    pub validated_users: HashMap<UserId, ValidatedUser>,
    pub submitted_at: DateTime<Utc>,
}

impl From<Submission> for ThemeRecord {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            title: submission.title,
            description: submission.description,
            preview_image: submission.preview_image,
            source_link: submission.source_link,
            tags: submission.tags,
            validated_users: submission.validated_users.0,
            submitted_at: submission.submitted_at,
        }
    }
}

/// Approved submissions, newest first.
pub async fn list_themes_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<ThemeRecord>>, ApiError> {
    let approved = Submission::list_by_state(SubmissionState::Approved, &state.db_pool).await?;
    let themes = approved.into_iter().map(ThemeRecord::from).collect();
    Ok(Json(themes))
}

/// One approved submission; pending and rejected ids read as absent.
pub async fn get_theme_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<SubmissionId>,
) -> Result<Json<ThemeRecord>, ApiError> {
    let submission = Submission::find_by_id(id, &state.db_pool)
        .await?
        .filter(|s| s.state == SubmissionState::Approved)
        .ok_or_else(|| ApiError::not_found("Theme not found"))?;

    Ok(Json(ThemeRecord::from(submission)))
}
