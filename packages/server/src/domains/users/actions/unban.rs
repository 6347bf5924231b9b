//! Unban action - restore a user's submission standing

use sqlx::PgPool;
use tracing::info;

use crate::common::{Actor, AdminCapability, ApiError, UserId};
use crate::domains::users::User;
use crate::kernel::{NewOutboxEntry, OutboxEntry};

/// Lift a user's submission ban.
///
/// Idempotent: unbanning a user who was never banned succeeds and leaves the
/// standing fields cleared. Pairs the standing change with a `user_unbanned`
/// notification intent in the same transaction.
pub async fn unban_user(user_id: UserId, acting_user: &User, pool: &PgPool) -> Result<User, ApiError> {
    Actor::new(acting_user.id, acting_user.is_admin)
        .can(AdminCapability::ManageBans)
        .check()?;

    let mut tx = pool.begin().await?;

    let Some(unbanned) = User::clear_ban(user_id, &mut tx).await? else {
        return Err(ApiError::not_found("User not found"));
    };
    OutboxEntry::enqueue(NewOutboxEntry::user_unbanned(user_id), &mut tx).await?;

    tx.commit().await?;

    info!(user_id = %user_id, moderator_id = %acting_user.id, "User submission ban lifted");

    Ok(unbanned)
}
