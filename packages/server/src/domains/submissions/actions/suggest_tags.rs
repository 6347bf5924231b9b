//! Tag suggestion action - runs the heuristics over a stored submission

use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::common::{Actor, AdminCapability, ApiError, SubmissionId};
use crate::domains::submissions::heuristics;
use crate::domains::submissions::models::Submission;
use crate::domains::users::User;

/// Compute advisory tags for the moderator reviewing a submission.
///
/// Suggestions degrade rather than fail: an unreadable content payload or
/// preview image just drops its tag from the list.
pub async fn suggest_tags(
    id: SubmissionId,
    acting_user: &User,
    pool: &PgPool,
) -> Result<Vec<String>, ApiError> {
    Actor::new(acting_user.id, acting_user.is_admin)
        .can(AdminCapability::ReviewSubmissions)
        .check()?;

    let submission = Submission::find_by_id(id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Submission not found"))?;

    let mut tags: Vec<&'static str> = Vec::new();

    match heuristics::classify_content(&submission.content) {
        Some(tag) => tags.push(tag),
        None => {
            warn!(submission_id = %id, "Content payload is not decodable, skipping content tag")
        }
    }

    match preview_image_bytes(&submission.preview_image).await {
        Some(bytes) => match heuristics::classify_image(&bytes) {
            Some(tag) => tags.push(tag),
            None => {
                warn!(submission_id = %id, "Preview image is not decodable, skipping image tag")
            }
        },
        None => debug!(submission_id = %id, "No usable preview image bytes"),
    }

    let suggestions = heuristics::dedup_tags(tags);
    info!(submission_id = %id, suggestions = ?suggestions, "Computed tag suggestions");

    Ok(suggestions)
}

/// Obtain preview image bytes: inline data URLs decode directly, plain
/// http(s) URLs are fetched. Any failure degrades to `None`.
async fn preview_image_bytes(preview_image: &str) -> Option<Vec<u8>> {
    if preview_image.starts_with("data:") {
        return heuristics::decode_data_url(preview_image);
    }
    if !preview_image.starts_with("http://") && !preview_image.starts_with("https://") {
        return None;
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .ok()?;

    match client.get(preview_image).send().await {
        Ok(resp) if resp.status().is_success() => resp.bytes().await.ok().map(|b| b.to_vec()),
        Ok(resp) => {
            warn!(status = %resp.status(), "Preview image fetch returned non-success status");
            None
        }
        Err(err) => {
            warn!(error = %err, "Preview image fetch failed");
            None
        }
    }
}
