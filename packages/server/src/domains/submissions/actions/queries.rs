//! Submission queries - review listing and single-record fetch

use sqlx::PgPool;
use tracing::debug;

use crate::common::{Actor, AdminCapability, ApiError, SubmissionId};
use crate::domains::submissions::models::{Submission, SubmissionState};
use crate::domains::users::User;

/// List submissions in one state for the review queue, newest first.
pub async fn list_submissions(
    state: SubmissionState,
    acting_user: &User,
    pool: &PgPool,
) -> Result<Vec<Submission>, ApiError> {
    Actor::new(acting_user.id, acting_user.is_admin)
        .can(AdminCapability::ReviewSubmissions)
        .check()?;

    let submissions = Submission::list_by_state(state, pool).await?;
    debug!(state = %state, count = submissions.len(), "Listed submissions");

    Ok(submissions)
}

/// Fetch one submission.
///
/// Admins see everything; a submitter sees their own record for as long as
/// it still carries their id. Rejected records are scrubbed and therefore
/// admin-only. Everyone else gets NotFound - existence is not revealed.
pub async fn get_submission(
    id: SubmissionId,
    acting_user: &User,
    pool: &PgPool,
) -> Result<Submission, ApiError> {
    let submission = Submission::find_by_id(id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Submission not found"))?;

    let is_own = submission.submitted_by == Some(acting_user.id);
    if !acting_user.is_admin && !is_own {
        return Err(ApiError::not_found("Submission not found"));
    }

    Ok(submission)
}
