//! Create submission action - the wizard's assembled draft becomes a
//! pending record

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::common::{ApiError, AuthError};
use crate::domains::submissions::models::{NewSubmission, Submission, ValidatedUser};
use crate::domains::users::actions::resolve_user_ids;
use crate::domains::users::User;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmissionRequest {
    pub title: String,
    pub description: String,
    /// Base64-transported CSS.
    pub content: String,
    /// Data URL or plain image URL.
    pub preview_image: String,
    pub source_link: String,
    /// Raw contributor ids as the submitter typed them.
    #[serde(default)]
    pub contributors: Vec<String>,
}

/// Create a pending submission on behalf of the authenticated user.
///
/// The ban standing is re-checked here no matter what the client claimed.
/// Contributor ids run through the validation batcher; ids that do not
/// resolve are dropped, and the submitter is always the first contributor
/// regardless of the typed list.
pub async fn create_submission(
    req: CreateSubmissionRequest,
    submitter: &User,
    pool: &PgPool,
) -> Result<Submission, ApiError> {
    if submitter.banned_from_submissions {
        return Err(AuthError::SubmissionsBanned.into());
    }

    validate_fields(&req)?;

    let resolved = resolve_user_ids(&req.contributors, pool).await?;
    if !resolved.failed.is_empty() {
        debug!(
            dropped = resolved.failed.len(),
            "Dropping contributor ids that did not resolve"
        );
    }

    let mut contributors = vec![submitter.id];
    let mut validated_users = HashMap::new();
    validated_users.insert(submitter.id, ValidatedUser::of(submitter));

    for user in resolved.validated {
        if contributors.contains(&user.id) {
            continue;
        }
        validated_users.insert(user.id, ValidatedUser::of(&user));
        contributors.push(user.id);
    }

    let submission = Submission::create(
        NewSubmission {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            source_link: req.source_link.trim().to_string(),
            content: req.content.trim().to_string(),
            preview_image: req.preview_image.trim().to_string(),
            contributors,
            validated_users,
            submitted_by: submitter.id,
        },
        pool,
    )
    .await?;

    info!(
        submission_id = %submission.id,
        submitted_by = %submitter.id,
        contributor_count = submission.contributors.len(),
        "Submission created"
    );

    Ok(submission)
}

fn validate_fields(req: &CreateSubmissionRequest) -> Result<(), ApiError> {
    if req.title.trim().chars().count() < 3 {
        return Err(ApiError::validation(
            "Title must be longer than 3 characters.",
        ));
    }
    if req.description.trim().is_empty() {
        return Err(ApiError::validation("Description is required."));
    }
    if req.preview_image.trim().is_empty() {
        return Err(ApiError::validation("Preview image is required."));
    }
    if req.source_link.trim().is_empty() {
        return Err(ApiError::validation("Source link is required."));
    }
    if req.content.trim().is_empty() {
        return Err(ApiError::validation("Content is required."));
    }
    if BASE64_STANDARD.decode(req.content.trim()).is_err() {
        return Err(ApiError::validation("Content must be valid base64."));
    }
    Ok(())
}
