use axum::extract::{Extension, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::common::{ApiError, AuthError};
use crate::domains::users::User;
use crate::server::app::AppState;

/// Authenticated user resolved for this request
///
/// Carries the full user row: the admin flag and the ban standing come from
/// the database on every request, not from token claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
}

/// Bearer authentication middleware
///
/// Extracts the bearer token from the Authorization header, verifies it,
/// resolves the user row, and adds AuthUser to request extensions. Missing
/// or invalid credentials reject the request; nothing behind this
/// middleware runs unauthenticated.
pub async fn bearer_auth_middleware(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or(AuthError::AuthenticationRequired)?
        .to_string();

    let claims = state
        .jwt_service
        .verify_token(&token)
        .map_err(|_| AuthError::InvalidToken)?;

    // A token whose user no longer exists is as good as no token.
    let user = User::find_by_id(claims.user_id, &state.db_pool)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    debug!(user_id = %user.id, is_admin = user.is_admin, "Authenticated user");
    request.extensions_mut().insert(AuthUser { user });

    Ok(next.run(request).await)
}

/// Extract the token from the Authorization header (handles both
/// "Bearer <token>" and a raw token)
fn bearer_token(request: &Request) -> Option<&str> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    Some(auth_str.strip_prefix("Bearer ").unwrap_or(auth_str))
}
