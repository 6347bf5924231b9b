//! Ban action - revoke a user's submission standing

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::common::{Actor, AdminCapability, ApiError, UserId};
use crate::domains::users::User;
use crate::kernel::{NewOutboxEntry, OutboxEntry};

pub const DEFAULT_BAN_REASON: &str = "Banned by moderator";

#[derive(Debug, Clone, Deserialize)]
pub struct BanRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Ban a user from submitting themes.
///
/// Idempotent: banning an already-banned user succeeds and overwrites the
/// standing fields. The standing change and its `user_banned` notification
/// intent commit in one transaction, so the pair can never split.
pub async fn ban_user(
    user_id: UserId,
    req: BanRequest,
    acting_user: &User,
    pool: &PgPool,
) -> Result<User, ApiError> {
    Actor::new(acting_user.id, acting_user.is_admin)
        .can(AdminCapability::ManageBans)
        .check()?;

    let reason = req
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_BAN_REASON)
        .to_string();

    let mut tx = pool.begin().await?;

    let Some(banned) = User::set_banned(user_id, &reason, acting_user.id, &mut tx).await? else {
        return Err(ApiError::not_found("User not found"));
    };
    OutboxEntry::enqueue(NewOutboxEntry::user_banned(user_id, &reason), &mut tx).await?;

    tx.commit().await?;

    info!(user_id = %user_id, moderator_id = %acting_user.id, "User banned from submissions");

    Ok(banned)
}
