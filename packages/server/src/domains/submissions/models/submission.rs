use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::types::Json;
use sqlx::{Decode, Encode, PgConnection, PgPool, Type};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::common::{SubmissionId, UserId};
use crate::domains::users::User;

/// Where a submission sits in its lifecycle. Stored as TEXT.
///
/// `pending` is the only state a moderation decision may act on; the other
/// two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Pending => "pending",
            SubmissionState::Approved => "approved",
            SubmissionState::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionState::Pending),
            "approved" => Ok(SubmissionState::Approved),
            "rejected" => Ok(SubmissionState::Rejected),
            other => Err(anyhow::anyhow!("invalid submission state: {other}")),
        }
    }
}

impl Type<Postgres> for SubmissionState {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for SubmissionState {
    fn encode_by_ref(
        &self,
        buf: &mut PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl Decode<'_, Postgres> for SubmissionState {
    fn decode(value: PgValueRef<'_>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

/// Display snapshot of a contributor, captured when the submission was
/// created. Immutable thereafter; later profile edits do not propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedUser {
    pub username: String,
    pub avatar: String,
}

impl ValidatedUser {
    pub fn of(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Display snapshot of the deciding moderator, set exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratorSnapshot {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
}

impl ModeratorSnapshot {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Fields the capture wizard supplies for a new submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub title: String,
    pub description: String,
    pub source_link: String,
    pub content: String,
    pub preview_image: String,
    pub contributors: Vec<UserId>,
    pub validated_users: HashMap<UserId, ValidatedUser>,
    pub submitted_by: UserId,
}

/// Submission model - SQL persistence layer
///
/// The record shape is the durable contract the moderation audit tooling
/// reads; field meanings are fixed even where the portal UI ignores them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Submission {
    pub id: SubmissionId,
    pub title: String,
    pub description: String,
    pub source_link: String,
    pub content: String,
    pub preview_image: String,

    pub contributors: Vec<UserId>,
    pub validated_users: Json<HashMap<UserId, ValidatedUser>>,

    pub state: SubmissionState,
    pub moderator: Option<Json<ModeratorSnapshot>>,
    pub reason: Option<String>,
    pub tags: Vec<String>,

    pub submitted_by: Option<UserId>,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Insert a new pending submission
    pub async fn create(new: NewSubmission, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO submissions (
                id,
                title,
                description,
                source_link,
                content,
                preview_image,
                contributors,
                validated_users,
                submitted_by
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(SubmissionId::new())
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.source_link)
        .bind(&new.content)
        .bind(&new.preview_image)
        .bind(&new.contributors)
        .bind(Json(&new.validated_users))
        .bind(new.submitted_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Find submission by ID
    pub async fn find_by_id(id: SubmissionId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Whether a submission row exists at all
    ///
    /// Used to tell a stale-state conflict (row exists, no longer pending)
    /// apart from a plain missing record after a guarded update matched
    /// nothing.
    pub async fn exists(id: SubmissionId, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM submissions WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// All submissions in one state, newest first
    pub async fn list_by_state(state: SubmissionState, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM submissions WHERE state = $1 ORDER BY submitted_at DESC",
        )
        .bind(state)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Transition pending -> approved
    ///
    /// The pending check and the mutation are one conditional update; a
    /// submission that is no longer pending matches nothing and `None`
    /// comes back, so a losing concurrent moderator can never double-apply
    /// or overwrite the winner's decision.
    pub async fn approve_pending(
        id: SubmissionId,
        tags: &[String],
        moderator: &ModeratorSnapshot,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE submissions
             SET state = 'approved', tags = $2, moderator = $3
             WHERE id = $1 AND state = 'pending'
             RETURNING *",
        )
        .bind(id)
        .bind(tags)
        .bind(Json(moderator))
        .fetch_optional(&mut *conn)
        .await
        .map_err(Into::into)
    }

    /// Transition pending -> rejected, scrubbing submitter identity
    ///
    /// Rejection removes `submitted_by` and `contributors` from the record
    /// (privacy minimization - moderation history keeps only what it needs).
    /// The pre-scrub submitter id is captured in the same statement and
    /// returned alongside the updated row so the caller can still address
    /// the rejection notice.
    pub async fn reject_pending(
        id: SubmissionId,
        reason: &str,
        moderator: &ModeratorSnapshot,
        conn: &mut PgConnection,
    ) -> Result<Option<(Self, Option<UserId>)>> {
        let row = sqlx::query_as::<_, (SubmissionId, Option<UserId>)>(
            "WITH prior AS (
                 SELECT id, submitted_by FROM submissions WHERE id = $1
             )
             UPDATE submissions s
             SET state = 'rejected',
                 reason = $2,
                 moderator = $3,
                 submitted_by = NULL,
                 contributors = '{}'
             FROM prior
             WHERE s.id = prior.id AND s.state = 'pending'
             RETURNING s.id, prior.submitted_by",
        )
        .bind(id)
        .bind(reason)
        .bind(Json(moderator))
        .fetch_optional(&mut *conn)
        .await?;

        let Some((id, prior_submitter)) = row else {
            return Ok(None);
        };

        let submission = sqlx::query_as::<_, Self>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(Some((submission, prior_submitter)))
    }
}
