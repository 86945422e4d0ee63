//! Privileged user provisioning. The two endpoints predate the rest of
//! the API and external tooling depends on their exact shapes, so they
//! bypass the standard `{success, data}` envelope: `200 {user, message}`
//! on success, `{error}` on failure.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::{hash_password, AdminUser};
use crate::extractors::JsonBody;
use crate::response::AppError;
use crate::routes::auth::UserProfile;
use crate::state::AppState;
use crate::store::operations::users::{User, UserRole};
use crate::store::StoreError;
use crate::validation::{is_valid_email, validate_name, validate_password};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-user", post(create_user))
        .route("/delete-user", delete(delete_user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
    pub tenant_id: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub user_data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub user_id: String,
}

fn raw_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn create_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Ok(raw_error(StatusCode::BAD_REQUEST, "Invalid email format"));
    }
    if let Err(msg) = validate_password(&req.password) {
        return Ok(raw_error(StatusCode::BAD_REQUEST, msg));
    }
    let name = req.name.trim();
    if let Err(msg) = validate_name(name) {
        return Ok(raw_error(StatusCode::BAD_REQUEST, msg));
    }
    if state.store().get_tenant(&req.tenant_id)?.is_none() {
        return Ok(raw_error(StatusCode::BAD_REQUEST, "Unknown tenant"));
    }

    let now = Utc::now();
    // Identity and profile live in one record, so creation is a single
    // atomic insert with nothing to roll back on partial failure.
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        name: name.to_string(),
        password_hash: hash_password(&req.password)?,
        role: req.role,
        tenant_id: req.tenant_id,
        position: req.position,
        user_data: req.user_data,
        is_active: true,
        points: 0,
        level: 1,
        streak: 0,
        last_learning_date: None,
        badges: vec![],
        failed_login_count: 0,
        locked_until: None,
        created_at: now,
        updated_at: now,
    };

    match state.store().create_user(&user) {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "user": UserProfile::from(&user),
                "message": "User created successfully",
            })),
        )
            .into_response()),
        Err(StoreError::Conflict { .. }) => Ok(raw_error(
            StatusCode::CONFLICT,
            "A user with this email already exists",
        )),
        Err(e) => {
            tracing::error!(error = %e, "User provisioning failed");
            Ok(raw_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create user",
            ))
        }
    }
}

async fn delete_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteUserRequest>,
) -> Result<Response, AppError> {
    match state.store().delete_user(&req.user_id) {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "message": "User deleted successfully" })),
        )
            .into_response()),
        Err(StoreError::NotFound { .. }) => {
            Ok(raw_error(StatusCode::NOT_FOUND, "User not found"))
        }
        Err(e) => {
            tracing::error!(error = %e, "User deletion failed");
            Ok(raw_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete user",
            ))
        }
    }
}
