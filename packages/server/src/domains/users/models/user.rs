use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::common::UserId;

/// User model - SQL persistence layer
///
/// Rows originate from the identity provider callback. The portal treats
/// username/avatar as display snapshots and owns only the ban fields.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub avatar: String,
    pub is_admin: bool,

    // Submission standing
    pub banned_from_submissions: bool,
    pub ban_reason: Option<String>,
    pub banned_at: Option<DateTime<Utc>>,
    pub banned_by: Option<UserId>,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Find user by ID
    ///
    /// Returns None when no such user exists; absent users are an expected
    /// condition throughout the engine, never an error.
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find all users matching the given ids, in one round trip
    ///
    /// Ids with no corresponding row are simply missing from the result;
    /// the contributor batcher reports those individually.
    pub async fn find_many_by_ids(ids: &[UserId], pool: &PgPool) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// List every known user id (announcement fan-out)
    pub async fn list_all_ids(pool: &PgPool) -> Result<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>("SELECT id FROM users ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new user (identity callback and test fixtures)
    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (id, username, avatar, is_admin)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(self.id)
        .bind(&self.username)
        .bind(&self.avatar)
        .bind(self.is_admin)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Ban a user from submitting
    ///
    /// Idempotent: banning an already-banned user succeeds and overwrites
    /// the standing fields. Returns None when the user row does not exist.
    /// Takes a connection so the caller can pair the standing change with
    /// its outbox intent in one transaction.
    pub async fn set_banned(
        id: UserId,
        reason: &str,
        banned_by: UserId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE users
             SET banned_from_submissions = true,
                 ban_reason = $2,
                 banned_at = NOW(),
                 banned_by = $3
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(reason)
        .bind(banned_by)
        .fetch_optional(&mut *conn)
        .await
        .map_err(Into::into)
    }

    /// Lift a user's submission ban
    ///
    /// Idempotent: unbanning a user in good standing succeeds and leaves the
    /// fields cleared. Returns None when the user row does not exist.
    pub async fn clear_ban(id: UserId, conn: &mut PgConnection) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE users
             SET banned_from_submissions = false,
                 ban_reason = NULL,
                 banned_at = NULL,
                 banned_by = NULL
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(Into::into)
    }
}
