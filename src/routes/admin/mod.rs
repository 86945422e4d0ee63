pub mod announcements;
pub mod courses;
pub mod tenants;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AdminUser;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::response::{ok, paginated, AppError};
use crate::state::AppState;
use crate::store::operations::users::{User, UserRole};

/// Safe admin view of a user (excludes password_hash).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminUserView {
    id: String,
    email: String,
    name: String,
    role: UserRole,
    tenant_id: String,
    is_active: bool,
    points: u64,
    level: u32,
    streak: u32,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    failed_login_count: u32,
    locked_until: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&User> for AdminUserView {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            email: u.email.clone(),
            name: u.name.clone(),
            role: u.role,
            tenant_id: u.tenant_id.clone(),
            is_active: u.is_active,
            points: u.points,
            level: u.level,
            streak: u.streak,
            created_at: u.created_at,
            updated_at: u.updated_at,
            failed_login_count: u.failed_login_count,
            locked_until: u.locked_until,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/tenants", tenants::router())
        .nest("/courses", courses::router())
        .nest("/announcements", announcements::router())
        .route("/users", get(list_users))
        .route("/users/:id/activate", post(activate_user))
        .route("/users/:id/deactivate", post(deactivate_user))
        .route("/stats", get(admin_stats))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListUsersQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    tenant_id: Option<String>,
}

async fn list_users(
    _admin: AdminUser,
    Query(q): Query<ListUsersQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let page = q.page.unwrap_or(1).max(1);
    let per_page = q
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let tenant = q.tenant_id.as_deref();

    let users = state.store().list_users(
        tenant,
        per_page as usize,
        ((page - 1) * per_page) as usize,
    )?;
    let total = state.store().count_users(tenant)?;
    let views: Vec<AdminUserView> = users.iter().map(AdminUserView::from).collect();

    Ok(paginated(views, total, page, per_page))
}

async fn activate_user(
    _admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.store().set_user_active(&id, true)?;
    Ok(ok(serde_json::json!({ "activated": true })))
}

async fn deactivate_user(
    admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if admin.user_id == id {
        return Err(AppError::bad_request(
            "CANNOT_DEACTIVATE_SELF",
            "Admins cannot deactivate their own account",
        ));
    }
    state.store().set_user_active(&id, false)?;
    // 立即使该用户的所有会话失效
    state.store().delete_user_sessions(&id)?;
    Ok(ok(serde_json::json!({ "deactivated": true })))
}

async fn admin_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let users = state.store().count_users(None)?;
    let courses = state.store().count_courses()?;
    let progress_records = state.store().count_progress_records()?;
    let tenants = state.store().list_tenants()?.len() as u64;

    Ok(ok(serde_json::json!({
        "users": users,
        "tenants": tenants,
        "courses": courses,
        "progressRecords": progress_records,
    })))
}
