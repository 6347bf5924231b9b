//! Notification feed actions - list and mark-all-read

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::common::ApiError;
use crate::domains::notifications::Notification;
use crate::domains::users::User;

/// The feed shows the most recent page only; older rows stay queryable
/// through the database, not the API.
pub const FEED_LIMIT: i64 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct MarkReadRequest {
    pub mark_all_as_read: bool,
}

/// The caller's notifications, newest first, capped at [`FEED_LIMIT`].
pub async fn list_notifications(user: &User, pool: &PgPool) -> Result<Vec<Notification>, ApiError> {
    let notifications = Notification::find_recent_by_user(user.id, FEED_LIMIT, pool).await?;
    debug!(user_id = %user.id, count = notifications.len(), "Listed notification feed");
    Ok(notifications)
}

/// Flip all of the caller's unread notifications to read.
///
/// `read` is monotonic, so repeating the call is harmless and reports zero
/// updates. The bulk flag must be explicit; there is no per-notification
/// variant to fall back to.
pub async fn mark_all_read(
    req: MarkReadRequest,
    user: &User,
    pool: &PgPool,
) -> Result<u64, ApiError> {
    if !req.mark_all_as_read {
        return Err(ApiError::validation("mark_all_as_read must be true."));
    }

    let updated = Notification::mark_all_read(user.id, pool).await?;
    info!(user_id = %user.id, updated, "Marked notifications read");

    Ok(updated)
}
