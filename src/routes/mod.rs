pub mod admin;
pub mod announcements;
pub mod auth;
pub mod courses;
pub mod gamification;
pub mod health;
pub mod learning;
pub mod provisioning;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::{rate_limit, request_id};
use crate::state::AppState;

/// Maximum request body size: 2 MiB.
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/auth", auth::router())
        .nest("/courses", courses::router())
        .nest("/learning", learning::router())
        .nest("/gamification", gamification::router())
        .nest("/announcements", announcements::router())
        .nest("/admin", admin::router())
        // Provisioning keeps its legacy flat paths and raw payload shapes
        .merge(provisioning::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    // 前端打包产物由后端直接托管，未知路径回退到 SPA 入口
    let spa_fallback = ServeDir::new("static").not_found_service(ServeFile::new("static/index.html"));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback_service(spa_fallback)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}
