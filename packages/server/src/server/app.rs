//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::server::middleware::bearer_auth_middleware;
use crate::server::routes::{
    announce_handler, approve_submission_handler, ban_user_handler, create_submission_handler,
    get_submission_handler, get_theme_handler, health_handler, list_notifications_handler,
    list_submissions_handler, list_themes_handler, mark_read_handler, reject_submission_handler,
    tag_suggestions_handler, unban_user_handler, validate_users_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
///
/// Every `/api` route sits behind bearer auth and the rate limit; `/health`
/// bypasses both so probes keep working while the API is saturated.
pub fn build_app(pool: PgPool, jwt_service: Arc<JwtService>) -> Router {
    let app_state = AppState {
        db_pool: pool,
        jwt_service,
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Rate limiting configuration
    // Base rate 10 requests per second per IP, bursts up to 20
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let api_routes = Router::new()
        .route(
            "/submissions",
            post(create_submission_handler).get(list_submissions_handler),
        )
        .route("/submissions/:id", get(get_submission_handler))
        .route("/submissions/:id/approve", post(approve_submission_handler))
        .route("/submissions/:id/reject", post(reject_submission_handler))
        .route(
            "/submissions/:id/tag-suggestions",
            get(tag_suggestions_handler),
        )
        .route("/themes", get(list_themes_handler))
        .route("/themes/:id", get(get_theme_handler))
        .route("/users/validate", post(validate_users_handler))
        .route("/users/:id/ban", post(ban_user_handler))
        .route("/users/:id/unban", post(unban_user_handler))
        .route("/notifications", get(list_notifications_handler))
        .route("/notifications/mark-read", post(mark_read_handler))
        .route("/announcements", post(announce_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(bearer_auth_middleware))
        .layer(rate_limit_layer);

    Router::new()
        .nest("/api", api_routes)
        // Health check (no auth, no rate limit)
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
