//! Contributor validation batcher
//!
//! Submitters paste contributor ids as free text; whatever survives the
//! client-side split lands here as raw strings. Every id succeeds or fails
//! on its own - partial success is the normal case and the batch as a whole
//! never errors because one id is garbage.

use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::common::{ApiError, UserId};
use crate::domains::users::User;

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateUsersRequest {
    pub ids: Vec<String>,
}

/// Outcome of resolving one batch of raw user ids.
#[derive(Debug, Default)]
pub struct ResolvedUsers {
    /// Users that resolved, in first-seen input order.
    pub validated: Vec<User>,
    /// Raw inputs that did not resolve, either malformed or unknown.
    pub failed: Vec<String>,
}

/// Resolve raw user-id strings against the user directory.
///
/// Blank fragments are dropped, duplicates collapse to their first
/// occurrence, malformed UUIDs and unknown ids land in `failed`. Resolution
/// of the known ids is a single `ANY($1)` query, not one round trip per id.
pub async fn resolve_user_ids(
    raw_ids: &[String],
    pool: &PgPool,
) -> Result<ResolvedUsers, ApiError> {
    let mut unique: Vec<&str> = Vec::new();
    for raw in raw_ids {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !unique.contains(&trimmed) {
            unique.push(trimmed);
        }
    }

    let mut parsed: Vec<(UserId, &str)> = Vec::new();
    let mut failed: Vec<String> = Vec::new();
    for raw in &unique {
        match UserId::parse(raw) {
            Ok(id) => parsed.push((id, raw)),
            Err(_) => {
                debug!(raw_id = %raw, "Contributor id is not a valid UUID");
                failed.push((*raw).to_string());
            }
        }
    }

    let ids: Vec<UserId> = parsed.iter().map(|(id, _)| *id).collect();
    let found = User::find_many_by_ids(&ids, pool).await?;
    let by_id: HashMap<UserId, User> = found.into_iter().map(|u| (u.id, u)).collect();

    let mut validated = Vec::new();
    for (id, raw) in parsed {
        match by_id.get(&id) {
            Some(user) => validated.push(user.clone()),
            None => {
                debug!(user_id = %id, "Contributor id does not match a known user");
                failed.push(raw.to_string());
            }
        }
    }

    info!(
        requested = raw_ids.len(),
        validated = validated.len(),
        failed = failed.len(),
        "Resolved contributor batch"
    );

    Ok(ResolvedUsers { validated, failed })
}
