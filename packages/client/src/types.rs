//! Wire types for the portal API.
//!
//! These mirror the server's JSON contract. Ids travel as plain UUID strings;
//! timestamps are RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Review state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Pending,
    Approved,
    Rejected,
}

/// Category of a notification row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ThemeApproved,
    ThemeRejected,
    UserBanned,
    UserUnbanned,
    Announcement,
}

/// Contributor profile snapshot stored on a submission, keyed by user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedUser {
    pub username: String,
    pub avatar: String,
}

/// One resolved contributor from the validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidatedUserEntry {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
}

/// Moderator identity captured on a decided submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModeratorSnapshot {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// Full submission record as the moderation surface returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub source_link: String,
    pub content: String,
    pub preview_image: String,
    pub contributors: Vec<Uuid>,
    pub validated_users: HashMap<Uuid, ValidatedUser>,
    pub state: SubmissionState,
    pub moderator: Option<ModeratorSnapshot>,
    pub reason: Option<String>,
    pub tags: Vec<String>,
    pub submitted_by: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
}

/// Published shape of an approved submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub preview_image: String,
    pub source_link: String,
    pub tags: Vec<String>,
    pub validated_users: HashMap<Uuid, ValidatedUser>,
    pub submitted_at: DateTime<Utc>,
}

/// One entry in a user's notification feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub reason: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Ban standing returned by the ban/unban endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Standing {
    pub id: Uuid,
    pub banned_from_submissions: bool,
    pub ban_reason: Option<String>,
}

/// Body for `POST /api/submissions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionDraft {
    pub title: String,
    pub description: String,
    /// Base64-transported CSS, assembled from the source link.
    pub content: String,
    pub preview_image: String,
    pub source_link: String,
    /// Raw contributor ids as typed; the server resolves and dedups them.
    pub contributors: Vec<String>,
}

/// Body for `POST /api/submissions/:id/reject`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
    pub ban_user: bool,
    pub ban_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSubmission {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateUsersResponse {
    pub validated: Vec<ValidatedUserEntry>,
    /// Raw inputs that did not resolve, reported individually.
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MarkReadResponse {
    pub updated: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnnounceResponse {
    pub queued: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TagSuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Error body every portal endpoint renders on failure.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
    pub message: String,
}
