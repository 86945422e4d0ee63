use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::engine::types::SubmittedAnswer;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::routes::courses::load_tenant_course;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/progress", get(list_my_progress))
        .route("/courses/:id/progress", get(course_progress))
        .route(
            "/courses/:id/lessons/:lesson_id/select",
            post(select_lesson),
        )
        .route(
            "/courses/:id/lessons/:lesson_id/complete",
            post(complete_lesson),
        )
        .route(
            "/courses/:id/lessons/:lesson_id/submit-quiz",
            post(submit_quiz),
        )
}

async fn list_my_progress(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let records = state.store().list_user_progress(&auth.user_id)?;
    Ok(ok(records))
}

async fn course_progress(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    load_tenant_course(&state, &auth, &id)?;
    let overview = state.engine().progress_overview(&auth.user_id, &id)?;
    Ok(ok(overview))
}

async fn select_lesson(
    auth: AuthUser,
    Path((id, lesson_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    load_tenant_course(&state, &auth, &id)?;
    let progress = state.engine().select_lesson(&auth.user_id, &id, &lesson_id)?;
    Ok(ok(progress))
}

async fn complete_lesson(
    auth: AuthUser,
    Path((id, lesson_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    load_tenant_course(&state, &auth, &id)?;
    let outcome = state
        .engine()
        .complete_lesson(&auth.user_id, &id, &lesson_id)?;
    Ok(ok(outcome))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitQuizRequest {
    answers: HashMap<String, SubmittedAnswer>,
}

async fn submit_quiz(
    auth: AuthUser,
    Path((id, lesson_id)): Path<(String, String)>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SubmitQuizRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    load_tenant_course(&state, &auth, &id)?;
    let outcome = state
        .engine()
        .submit_quiz(&auth.user_id, &id, &lesson_id, &req.answers)?;
    Ok(ok(outcome))
}
