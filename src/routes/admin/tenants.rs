use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AdminUser;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::tenants::Tenant;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tenants).post(create_tenant))
        .route("/:id", patch(update_tenant))
}

async fn list_tenants(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    Ok(ok(state.store().list_tenants()?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTenantRequest {
    name: String,
}

async fn create_tenant(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTenantRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request(
            "INVALID_TENANT_NAME",
            "Tenant name must not be empty",
        ));
    }

    let now = Utc::now();
    let tenant = Tenant {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.store().create_tenant(&tenant)?;
    Ok(created(tenant))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTenantRequest {
    name: Option<String>,
    is_active: Option<bool>,
}

async fn update_tenant(
    _admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateTenantRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut tenant = state
        .store()
        .get_tenant(&id)?
        .ok_or_else(|| AppError::not_found("Tenant not found"))?;

    if let Some(name) = req.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request(
                "INVALID_TENANT_NAME",
                "Tenant name must not be empty",
            ));
        }
        tenant.name = name;
    }
    if let Some(is_active) = req.is_active {
        tenant.is_active = is_active;
    }
    tenant.updated_at = Utc::now();

    state.store().update_tenant(&tenant)?;
    Ok(ok(tenant))
}
