//! User routes - contributor validation and submission standing

use axum::extract::{Extension, Path};
use axum::Json;
use serde::Serialize;

use crate::common::{ApiError, UserId};
use crate::domains::users::actions::{
    ban_user, resolve_user_ids, unban_user, BanRequest, ValidateUsersRequest,
};
use crate::domains::users::User;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Serialize)]
pub struct ValidatedUserEntry {
    pub id: UserId,
    pub username: String,
    pub avatar: String,
}

#[derive(Serialize)]
pub struct ValidateUsersResponse {
    pub validated: Vec<ValidatedUserEntry>,
    pub failed: Vec<String>,
}

/// Ban standing after a ban or unban.
#[derive(Serialize)]
pub struct StandingResponse {
    pub id: UserId,
    pub banned_from_submissions: bool,
    pub ban_reason: Option<String>,
}

impl From<User> for StandingResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            banned_from_submissions: user.banned_from_submissions,
            ban_reason: user.ban_reason,
        }
    }
}

/// Resolve typed contributor ids so the wizard can show which failed.
pub async fn validate_users_handler(
    Extension(state): Extension<AppState>,
    Json(req): Json<ValidateUsersRequest>,
) -> Result<Json<ValidateUsersResponse>, ApiError> {
    let resolved = resolve_user_ids(&req.ids, &state.db_pool).await?;

    let validated = resolved
        .validated
        .into_iter()
        .map(|user| ValidatedUserEntry {
            id: user.id,
            username: user.username,
            avatar: user.avatar,
        })
        .collect();

    Ok(Json(ValidateUsersResponse {
        validated,
        failed: resolved.failed,
    }))
}

pub async fn ban_user_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<UserId>,
    Json(req): Json<BanRequest>,
) -> Result<Json<StandingResponse>, ApiError> {
    let banned = ban_user(id, req, &auth.user, &state.db_pool).await?;
    Ok(Json(banned.into()))
}

pub async fn unban_user_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<UserId>,
) -> Result<Json<StandingResponse>, ApiError> {
    let unbanned = unban_user(id, &auth.user, &state.db_pool).await?;
    Ok(Json(unbanned.into()))
}
