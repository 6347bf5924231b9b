//! Notification routes - feed listing, mark-all-read, announcements

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::common::ApiError;
use crate::domains::notifications::actions::{
    announce, list_notifications, mark_all_read, AnnounceRequest, MarkReadRequest,
};
use crate::domains::notifications::Notification;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

#[derive(Serialize)]
pub struct AnnounceResponse {
    pub queued: u64,
}

pub async fn list_notifications_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = list_notifications(&auth.user, &state.db_pool).await?;
    Ok(Json(notifications))
}

pub async fn mark_read_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let updated = mark_all_read(req, &auth.user, &state.db_pool).await?;
    Ok(Json(MarkReadResponse { updated }))
}

/// Fan an announcement out to every known user. Accepted, not delivered:
/// the dispatcher drains the queued intents.
pub async fn announce_handler(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<AnnounceRequest>,
) -> Result<(StatusCode, Json<AnnounceResponse>), ApiError> {
    let queued = announce(req, &auth.user, &state.db_pool).await?;
    Ok((StatusCode::ACCEPTED, Json(AnnounceResponse { queued })))
}
