//! Approve action - pending to approved, with moderator-confirmed tags

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::common::{Actor, AdminCapability, ApiError, SubmissionId};
use crate::domains::submissions::heuristics::dedup_tags;
use crate::domains::submissions::models::{ModeratorSnapshot, Submission};
use crate::domains::users::User;
use crate::kernel::{NewOutboxEntry, OutboxEntry};

use super::stale_transition_error;

pub const MAX_TAGS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct ApproveRequest {
    /// Final tag set. May diverge freely from the heuristic suggestions.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Approve a pending submission.
///
/// The pending check and the mutation are one conditional update; when it
/// matches nothing the caller learns whether the record was stale or
/// missing, and nothing has changed. The approval notification intent is
/// enqueued in the same transaction as the transition.
pub async fn approve_submission(
    id: SubmissionId,
    req: ApproveRequest,
    acting_user: &User,
    pool: &PgPool,
) -> Result<Submission, ApiError> {
    Actor::new(acting_user.id, acting_user.is_admin)
        .can(AdminCapability::ApproveSubmission)
        .check()?;

    let tags = dedup_tags(req.tags);
    if tags.len() > MAX_TAGS {
        return Err(ApiError::validation("A maximum of 5 tags is allowed."));
    }

    let moderator = ModeratorSnapshot::of(acting_user);

    let mut tx = pool.begin().await?;

    let Some(approved) = Submission::approve_pending(id, &tags, &moderator, &mut tx).await? else {
        return Err(stale_transition_error(id, pool).await);
    };

    match approved.submitted_by {
        Some(submitter) => {
            OutboxEntry::enqueue(
                NewOutboxEntry::theme_approved(submitter, &approved.title),
                &mut tx,
            )
            .await?;
        }
        None => warn!(submission_id = %id, "Approved submission has no submitter to notify"),
    }

    tx.commit().await?;

    info!(
        submission_id = %id,
        moderator_id = %acting_user.id,
        tag_count = tags.len(),
        "Submission approved"
    );

    Ok(approved)
}
