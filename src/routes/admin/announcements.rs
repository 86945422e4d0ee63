use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::auth::AdminUser;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::announcements::Announcement;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route("/:tenant_id/:id", axum::routing::delete(delete_announcement))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    tenant_id: String,
    #[serde(default)]
    include_expired: bool,
    limit: Option<usize>,
}

async fn list_announcements(
    _admin: AdminUser,
    Query(q): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = q.limit.unwrap_or(100).clamp(1, 500);
    let items = state
        .store()
        .list_announcements(&q.tenant_id, q.include_expired, limit)?;
    Ok(ok(items))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAnnouncementRequest {
    tenant_id: String,
    title: String,
    body: String,
    /// Days until the announcement expires; absent means it never does.
    expires_in_days: Option<i64>,
}

async fn create_announcement(
    admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateAnnouncementRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::bad_request(
            "INVALID_ANNOUNCEMENT",
            "Announcement title must not be empty",
        ));
    }
    if state.store().get_tenant(&req.tenant_id)?.is_none() {
        return Err(AppError::bad_request("UNKNOWN_TENANT", "Unknown tenant"));
    }

    let announcement = Announcement {
        id: uuid::Uuid::new_v4().to_string(),
        tenant_id: req.tenant_id,
        title: req.title.trim().to_string(),
        body: req.body,
        created_by: admin.user_id,
        created_at: Utc::now(),
        expires_at: req.expires_in_days.map(|d| Utc::now() + Duration::days(d)),
    };
    state.store().create_announcement(&announcement)?;
    Ok(created(announcement))
}

async fn delete_announcement(
    _admin: AdminUser,
    Path((tenant_id, id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.store().delete_announcement(&tenant_id, &id)?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}
