//! Outbox entry model and queue operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::{Decode, Encode, PgConnection, PgPool, Type};
use std::fmt;
use std::str::FromStr;

use crate::common::{OutboxEntryId, UserId};
use crate::domains::notifications::NotificationKind;

/// Delivery lifecycle of an intent row. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    Processing,
    Delivered,
    Dead,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Processing => "processing",
            OutboxStatus::Delivered => "delivered",
            OutboxStatus::Dead => "dead",
        }
    }
}

impl fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutboxStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OutboxStatus::Pending),
            "processing" => Ok(OutboxStatus::Processing),
            "delivered" => Ok(OutboxStatus::Delivered),
            "dead" => Ok(OutboxStatus::Dead),
            other => Err(anyhow::anyhow!("invalid outbox status: {other}")),
        }
    }
}

impl Type<Postgres> for OutboxStatus {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for OutboxStatus {
    fn encode_by_ref(
        &self,
        buf: &mut PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl Decode<'_, Postgres> for OutboxStatus {
    fn decode(value: PgValueRef<'_>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

/// A delivery intent waiting to be enqueued.
///
/// The constructors are the single place the user-facing notification
/// strings live; actions build intents, never raw message text.
#[derive(Debug, Clone)]
pub struct NewOutboxEntry {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub reason: Option<String>,
}

impl NewOutboxEntry {
    pub fn theme_approved(user_id: UserId, title: &str) -> Self {
        Self {
            user_id,
            kind: NotificationKind::ThemeApproved,
            message: format!("Your theme \"{title}\" has been approved!"),
            reason: None,
        }
    }

    pub fn theme_rejected(user_id: UserId, title: &str, reason: &str) -> Self {
        Self {
            user_id,
            kind: NotificationKind::ThemeRejected,
            message: format!("Your theme \"{title}\" has been rejected."),
            reason: Some(reason.to_string()),
        }
    }

    pub fn user_banned(user_id: UserId, reason: &str) -> Self {
        Self {
            user_id,
            kind: NotificationKind::UserBanned,
            message: "Your account has been banned from submitting themes".to_string(),
            reason: Some(reason.to_string()),
        }
    }

    pub fn user_unbanned(user_id: UserId) -> Self {
        Self {
            user_id,
            kind: NotificationKind::UserUnbanned,
            message: "Your submission ban has been lifted".to_string(),
            reason: None,
        }
    }

    /// Announcements render the title as the message line and carry the body
    /// in the reason field; the feed has always displayed them that way.
    pub fn announcement(user_id: UserId, title: &str, message: &str) -> Self {
        Self {
            user_id,
            kind: NotificationKind::Announcement,
            message: title.to_string(),
            reason: Some(message.to_string()),
        }
    }
}

/// Outbox entry - a durable notification intent
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutboxEntry {
    pub id: OutboxEntryId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub reason: Option<String>,

    pub status: OutboxStatus,
    pub retry_count: i32,
    pub max_retries: i32,
    pub last_error: Option<String>,

    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub claimed_by: Option<String>,
}

impl OutboxEntry {
    /// Enqueue one intent on the caller's connection.
    ///
    /// Callers pass the connection of the transaction that performs the
    /// state change, so intent and transition commit or roll back together.
    pub async fn enqueue(entry: NewOutboxEntry, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO notification_outbox (id, user_id, kind, message, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(OutboxEntryId::new())
        .bind(entry.user_id)
        .bind(entry.kind)
        .bind(&entry.message)
        .bind(&entry.reason)
        .fetch_one(&mut *conn)
        .await
        .map_err(Into::into)
    }

    /// Enqueue a batch of intents with a single INSERT (announcement fan-out)
    pub async fn enqueue_many(entries: &[NewOutboxEntry], conn: &mut PgConnection) -> Result<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        // Build VALUES clause with all intents
        let mut query =
            String::from("INSERT INTO notification_outbox (id, user_id, kind, message, reason) VALUES ");

        for idx in 0..entries.len() {
            if idx > 0 {
                query.push_str(", ");
            }
            let base = idx * 5;
            query.push_str(&format!(
                "(${}, ${}, ${}, ${}, ${})",
                base + 1,
                base + 2,
                base + 3,
                base + 4,
                base + 5
            ));
        }

        let mut q = sqlx::query(&query);
        for entry in entries {
            q = q
                .bind(OutboxEntryId::new())
                .bind(entry.user_id)
                .bind(entry.kind)
                .bind(&entry.message)
                .bind(&entry.reason);
        }

        let result = q.execute(&mut *conn).await?;

        Ok(result.rows_affected())
    }

    /// Claim up to `limit` deliverable intents for this worker.
    ///
    /// `FOR UPDATE SKIP LOCKED` keeps concurrent dispatchers from claiming
    /// the same rows.
    pub async fn claim_batch(worker_id: &str, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE notification_outbox
             SET status = 'processing', claimed_by = $1
             WHERE id IN (
                 SELECT id FROM notification_outbox
                 WHERE status = 'pending'
                   AND scheduled_at <= NOW()
                 ORDER BY scheduled_at
                 LIMIT $2
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING *",
        )
        .bind(worker_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Mark an intent as delivered.
    pub async fn mark_delivered(id: OutboxEntryId, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "UPDATE notification_outbox
             SET status = 'delivered', delivered_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Mark an intent as failed.
    ///
    /// Retryable failures with budget left go back to pending with
    /// exponential backoff (2^retry seconds, capped at one hour); everything
    /// else dead-letters.
    pub async fn mark_failed(
        id: OutboxEntryId,
        error: &str,
        retryable: bool,
        pool: &PgPool,
    ) -> Result<()> {
        let (retry_count, max_retries) = sqlx::query_as::<_, (i32, i32)>(
            "SELECT retry_count, max_retries FROM notification_outbox WHERE id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        if retryable && retry_count < max_retries {
            let delay_secs = 2i64.pow(retry_count as u32).min(3600); // Max 1 hour

            sqlx::query(
                "UPDATE notification_outbox
                 SET status = 'pending',
                     retry_count = retry_count + 1,
                     last_error = $2,
                     scheduled_at = NOW() + ($3 || ' seconds')::INTERVAL,
                     claimed_by = NULL
                 WHERE id = $1",
            )
            .bind(id)
            .bind(error)
            .bind(delay_secs.to_string())
            .execute(pool)
            .await?;
        } else {
            sqlx::query(
                "UPDATE notification_outbox
                 SET status = 'dead',
                     last_error = $2
                 WHERE id = $1",
            )
            .bind(id)
            .bind(error)
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    /// Number of intents still awaiting delivery (health endpoint)
    pub async fn count_pending(pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notification_outbox WHERE status = 'pending'",
        )
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// All intents targeting one user, oldest first (test assertions)
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM notification_outbox WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
