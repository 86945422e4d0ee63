use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::auth::AuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(my_summary))
        .route("/levels", get(level_catalog))
        .route("/badges", get(badge_catalog))
}

async fn my_summary(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let summary = state.engine().gamification_summary(&auth.user_id)?;
    Ok(ok(summary))
}

async fn level_catalog(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    Ok(ok(state.store().list_levels()?))
}

async fn badge_catalog(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    Ok(ok(state.store().list_badges()?))
}
