//! Reject action - pending to rejected, scrubbing the submitter and
//! optionally banning them

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::common::{Actor, AdminCapability, ApiError, SubmissionId};
use crate::domains::submissions::models::{ModeratorSnapshot, Submission};
use crate::domains::users::User;
use crate::kernel::{NewOutboxEntry, OutboxEntry};

use super::stale_transition_error;

pub const DEFAULT_REJECT_REASON: &str = "No reason provided";
pub const DEFAULT_REJECT_BAN_REASON: &str = "Rejected multiple times";

#[derive(Debug, Clone, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
    /// Also revoke the submitter's submission standing.
    #[serde(default)]
    pub ban_user: bool,
    #[serde(default)]
    pub ban_reason: Option<String>,
}

/// Reject a pending submission.
///
/// Rejection scrubs `submitted_by` and `contributors` from the record; the
/// pre-scrub submitter id comes back from the guarded update itself, so the
/// rejection notice and an optional ban still reach the right account. The
/// transition, the optional ban, and their notification intents commit as
/// one transaction.
pub async fn reject_submission(
    id: SubmissionId,
    req: RejectRequest,
    acting_user: &User,
    pool: &PgPool,
) -> Result<Submission, ApiError> {
    Actor::new(acting_user.id, acting_user.is_admin)
        .can(AdminCapability::RejectSubmission)
        .check()?;

    let reason = non_blank_or(req.reason.as_deref(), DEFAULT_REJECT_REASON);
    let moderator = ModeratorSnapshot::of(acting_user);

    let mut tx = pool.begin().await?;

    let Some((rejected, prior_submitter)) =
        Submission::reject_pending(id, &reason, &moderator, &mut tx).await?
    else {
        return Err(stale_transition_error(id, pool).await);
    };

    match prior_submitter {
        Some(submitter) => {
            OutboxEntry::enqueue(
                NewOutboxEntry::theme_rejected(submitter, &rejected.title, &reason),
                &mut tx,
            )
            .await?;

            if req.ban_user {
                let ban_reason = non_blank_or(req.ban_reason.as_deref(), DEFAULT_REJECT_BAN_REASON);
                let banned = User::set_banned(submitter, &ban_reason, acting_user.id, &mut tx)
                    .await?
                    .is_some();
                if banned {
                    OutboxEntry::enqueue(
                        NewOutboxEntry::user_banned(submitter, &ban_reason),
                        &mut tx,
                    )
                    .await?;
                } else {
                    warn!(user_id = %submitter, "Ban requested for a submitter with no user record");
                }
            }
        }
        None => warn!(submission_id = %id, "Rejected submission has no submitter to notify"),
    }

    tx.commit().await?;

    info!(
        submission_id = %id,
        moderator_id = %acting_user.id,
        ban_user = req.ban_user,
        "Submission rejected"
    );

    Ok(rejected)
}

fn non_blank_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
