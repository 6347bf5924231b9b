//! Announcement fan-out - one notification intent per known user

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::common::{Actor, AdminCapability, ApiError};
use crate::domains::users::User;
use crate::kernel::{NewOutboxEntry, OutboxEntry};

#[derive(Debug, Clone, Deserialize)]
pub struct AnnounceRequest {
    pub title: String,
    pub message: String,
}

/// Queue an announcement for every known user.
///
/// The fan-out is a single multi-VALUES outbox insert; delivery happens
/// per-entry in the dispatcher, so a partial delivery retries entry by
/// entry. Re-running the same announcement queues it again - there is no
/// de-duplication key. Returns the number of intents queued.
pub async fn announce(
    req: AnnounceRequest,
    acting_user: &User,
    pool: &PgPool,
) -> Result<u64, ApiError> {
    Actor::new(acting_user.id, acting_user.is_admin)
        .can(AdminCapability::PublishAnnouncements)
        .check()?;

    let title = req.title.trim();
    let message = req.message.trim();
    if title.is_empty() {
        return Err(ApiError::validation("Announcement title is required."));
    }
    if message.is_empty() {
        return Err(ApiError::validation("Announcement message is required."));
    }

    let recipients = User::list_all_ids(pool).await?;
    let entries: Vec<NewOutboxEntry> = recipients
        .iter()
        .map(|user_id| NewOutboxEntry::announcement(*user_id, title, message))
        .collect();

    let mut conn = pool.acquire().await?;
    let queued = OutboxEntry::enqueue_many(&entries, &mut conn).await?;

    info!(
        moderator_id = %acting_user.id,
        queued,
        "Announcement queued for all users"
    );

    Ok(queued)
}
