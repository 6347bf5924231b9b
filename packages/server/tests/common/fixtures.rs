//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::Utc;
use portal_core::common::UserId;
use portal_core::domains::submissions::models::{NewSubmission, Submission, ValidatedUser};
use portal_core::domains::users::User;
use sqlx::PgPool;
use std::collections::HashMap;

/// Create a test user
pub async fn create_test_user(pool: &PgPool, username: &str, is_admin: bool) -> Result<User> {
    let user = User {
        id: UserId::new(),
        username: username.to_string(),
        avatar: format!("https://cdn.example/avatars/{username}.png"),
        is_admin,
        banned_from_submissions: false,
        ban_reason: None,
        banned_at: None,
        banned_by: None,
        created_at: Utc::now(),
    };

    user.insert(pool).await
}

/// Base64-encode a CSS payload the way the capture wizard does
pub fn encoded_css(css: &str) -> String {
    BASE64_STANDARD.encode(css)
}

/// Create a pending submission owned by `submitter`
pub async fn create_pending_submission(
    pool: &PgPool,
    submitter: &User,
    title: &str,
) -> Result<Submission> {
    let mut validated_users = HashMap::new();
    validated_users.insert(submitter.id, ValidatedUser::of(submitter));

    Submission::create(
        NewSubmission {
            title: title.to_string(),
            description: "A test theme".to_string(),
            source_link: "https://github.com/example/theme/blob/main/theme.css".to_string(),
            content: encoded_css(".sidebar { background: #1e1e2e; }"),
            preview_image: "https://cdn.example/previews/theme.png".to_string(),
            contributors: vec![submitter.id],
            validated_users,
            submitted_by: submitter.id,
        },
        pool,
    )
    .await
}
