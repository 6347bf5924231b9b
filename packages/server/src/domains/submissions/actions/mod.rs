pub mod approve;
pub mod create;
pub mod queries;
pub mod reject;
pub mod suggest_tags;

pub use approve::{approve_submission, ApproveRequest};
pub use create::{create_submission, CreateSubmissionRequest};
pub use queries::{get_submission, list_submissions};
pub use reject::{reject_submission, RejectRequest};
pub use suggest_tags::suggest_tags;

use sqlx::PgPool;

use crate::common::{ApiError, SubmissionId};
use crate::domains::submissions::models::Submission;

/// Why a pending-only guarded update matched nothing: the row exists in a
/// terminal state (conflict, caller should refetch) or it does not exist
/// at all.
pub(crate) async fn stale_transition_error(id: SubmissionId, pool: &PgPool) -> ApiError {
    match Submission::exists(id, pool).await {
        Ok(true) => ApiError::conflict("Submission is not pending"),
        Ok(false) => ApiError::not_found("Submission not found"),
        Err(err) => ApiError::Internal(err),
    }
}
