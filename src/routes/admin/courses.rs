use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AdminUser;
use crate::engine::types::{Course, Section};
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::validation::validate_course;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:id", put(update_course).delete(delete_course))
        .route("/:id/publish", post(publish_course))
        .route("/:id/unpublish", post(unpublish_course))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    tenant_id: Option<String>,
}

/// Admin listing includes unpublished drafts.
async fn list_courses(
    _admin: AdminUser,
    Query(q): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let courses = state.store().list_courses(q.tenant_id.as_deref(), false)?;
    Ok(ok(courses))
}

/// Full course definition as authored. Quiz configs here carry the
/// correct answers; they are only redacted on the learner-facing routes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseBody {
    tenant_id: String,
    title: String,
    #[serde(default)]
    description: String,
    sections: Vec<Section>,
}

fn build_course(id: String, body: CourseBody, is_published: bool) -> Course {
    let now = Utc::now();
    Course {
        id,
        tenant_id: body.tenant_id,
        title: body.title,
        description: body.description,
        sections: body.sections,
        is_published,
        created_at: now,
        updated_at: now,
    }
}

async fn create_course(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CourseBody>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if state.store().get_tenant(&body.tenant_id)?.is_none() {
        return Err(AppError::bad_request("UNKNOWN_TENANT", "Unknown tenant"));
    }

    let course = build_course(uuid::Uuid::new_v4().to_string(), body, false);
    validate_course(&course).map_err(|msg| AppError::bad_request("INVALID_COURSE", &msg))?;

    state.store().create_course(&course)?;
    Ok(created(course))
}

async fn update_course(
    _admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CourseBody>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let existing = state
        .store()
        .get_course(&id)?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    let mut course = build_course(id, body, existing.is_published);
    course.created_at = existing.created_at;
    validate_course(&course).map_err(|msg| AppError::bad_request("INVALID_COURSE", &msg))?;

    state.store().update_course(&course)?;
    Ok(ok(course))
}

async fn publish_course(
    _admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    set_published(&state, &id, true).await
}

async fn unpublish_course(
    _admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    set_published(&state, &id, false).await
}

async fn set_published(
    state: &AppState,
    id: &str,
    is_published: bool,
) -> Result<axum::response::Response, AppError> {
    use axum::response::IntoResponse;

    let mut course = state
        .store()
        .get_course(id)?
        .ok_or_else(|| AppError::not_found("Course not found"))?;
    course.is_published = is_published;
    course.updated_at = Utc::now();
    state.store().update_course(&course)?;
    Ok(ok(serde_json::json!({ "isPublished": is_published })).into_response())
}

async fn delete_course(
    _admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.store().delete_course(&id)?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}
