use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::{Decode, Encode, PgPool, Type};
use std::fmt;
use std::str::FromStr;

use crate::common::{NotificationId, UserId};

/// What a notification is about. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ThemeApproved,
    ThemeRejected,
    UserBanned,
    UserUnbanned,
    Announcement,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ThemeApproved => "theme_approved",
            NotificationKind::ThemeRejected => "theme_rejected",
            NotificationKind::UserBanned => "user_banned",
            NotificationKind::UserUnbanned => "user_unbanned",
            NotificationKind::Announcement => "announcement",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "theme_approved" => Ok(NotificationKind::ThemeApproved),
            "theme_rejected" => Ok(NotificationKind::ThemeRejected),
            "user_banned" => Ok(NotificationKind::UserBanned),
            "user_unbanned" => Ok(NotificationKind::UserUnbanned),
            "announcement" => Ok(NotificationKind::Announcement),
            other => Err(anyhow::anyhow!("invalid notification kind: {other}")),
        }
    }
}

// Stored as plain TEXT, so delegate the sqlx plumbing to &str/String.

impl Type<Postgres> for NotificationKind {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for NotificationKind {
    fn encode_by_ref(
        &self,
        buf: &mut PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl Decode<'_, Postgres> for NotificationKind {
    fn decode(value: PgValueRef<'_>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

/// Notification record - a one-way message to a user
///
/// Append-only; only the read flag ever changes, and only false -> true.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub reason: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Append one notification
    ///
    /// The recipient id is referenced by value; it is valid for no matching
    /// user row to exist.
    pub async fn append(
        user_id: UserId,
        kind: NotificationKind,
        message: &str,
        reason: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO notifications (id, user_id, kind, message, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(user_id)
        .bind(kind)
        .bind(message)
        .bind(reason)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// The user's feed: newest first, bounded
    pub async fn find_recent_by_user(
        user_id: UserId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM notifications
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Flip every unread notification for the user to read
    ///
    /// Monotonic by construction: the statement only touches unread rows and
    /// nothing here (or anywhere) sets read back to false.
    pub async fn mark_all_read(user_id: UserId, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = true WHERE user_id = $1 AND read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
