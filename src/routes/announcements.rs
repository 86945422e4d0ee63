use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_announcements))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

/// Active announcements for the caller's tenant, newest first. Expired
/// entries are filtered out here and purged by the cleanup worker.
async fn list_announcements(
    auth: AuthUser,
    Query(q): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = q.limit.unwrap_or(50).clamp(1, 200);
    let items = state
        .store()
        .list_announcements(&auth.tenant_id, false, limit)?;
    Ok(ok(items))
}
