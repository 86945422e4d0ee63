use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::engine::quiz::{self, QuestionView};
use crate::engine::types::{Course, Lesson, LessonKind};
use crate::response::{ok, paginated, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/:id", get(get_course))
        .route("/:id/lessons/:lesson_id/quiz", get(get_quiz))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u64>,
    per_page: Option<u64>,
}

/// Course metadata without lesson content, for catalog listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseSummary {
    id: String,
    title: String,
    description: String,
    lesson_count: usize,
    duration_minutes: u32,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            lesson_count: course.lesson_count(),
            duration_minutes: course.flattened_lessons().map(|l| l.duration_minutes).sum(),
        }
    }
}

/// Learner view of a lesson. Quiz answers never leave the server; only
/// the quiz shape is exposed here, the questions come from the dedicated
/// quiz endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LessonView {
    id: String,
    title: String,
    #[serde(rename = "type")]
    kind: LessonKind,
    content: String,
    duration_minutes: u32,
    is_mandatory: bool,
    is_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    quiz: Option<QuizMeta>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizMeta {
    passing_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_limit_minutes: Option<u32>,
    question_count: usize,
}

impl From<&Lesson> for LessonView {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.clone(),
            title: lesson.title.clone(),
            kind: lesson.kind,
            content: lesson.content.clone(),
            duration_minutes: lesson.duration_minutes,
            is_mandatory: lesson.is_mandatory,
            is_preview: lesson.is_preview,
            quiz: lesson.quiz.as_ref().map(|q| QuizMeta {
                passing_score: q.passing_score,
                max_attempts: q.max_attempts,
                time_limit_minutes: q.time_limit_minutes,
                question_count: q.questions.len(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionView {
    id: String,
    title: String,
    lessons: Vec<LessonView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseDetail {
    id: String,
    title: String,
    description: String,
    sections: Vec<SectionView>,
}

/// Load a published course belonging to the caller's tenant; learners
/// never see other tenants' catalogs or unpublished drafts.
pub(crate) fn load_tenant_course(
    state: &AppState,
    auth: &AuthUser,
    course_id: &str,
) -> Result<Course, AppError> {
    let course = state
        .store()
        .get_course(course_id)?
        .filter(|c| c.tenant_id == auth.tenant_id && c.is_published)
        .ok_or_else(|| AppError::not_found("Course not found"))?;
    Ok(course)
}

async fn list_courses(
    auth: AuthUser,
    Query(q): Query<PageQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let page = q.page.unwrap_or(1).max(1);
    let per_page = q
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let all = state.store().list_courses(Some(&auth.tenant_id), true)?;
    let total = all.len() as u64;
    let items: Vec<CourseSummary> = all
        .iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .map(CourseSummary::from)
        .collect();

    Ok(paginated(items, total, page, per_page))
}

async fn get_course(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let course = load_tenant_course(&state, &auth, &id)?;

    let detail = CourseDetail {
        id: course.id.clone(),
        title: course.title.clone(),
        description: course.description.clone(),
        sections: course
            .sections
            .iter()
            .map(|s| SectionView {
                id: s.id.clone(),
                title: s.title.clone(),
                lessons: s.lessons.iter().map(LessonView::from).collect(),
            })
            .collect(),
    };
    Ok(ok(detail))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizView {
    lesson_id: String,
    passing_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_limit_minutes: Option<u32>,
    questions: Vec<QuestionView>,
}

async fn get_quiz(
    auth: AuthUser,
    Path((id, lesson_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let course = load_tenant_course(&state, &auth, &id)?;
    let lesson = course
        .find_lesson(&lesson_id)
        .ok_or_else(|| AppError::not_found("Lesson not found"))?;
    let config = lesson
        .quiz
        .as_ref()
        .ok_or_else(|| AppError::bad_request("NOT_A_QUIZ", "Lesson is not a quiz"))?;

    let questions = quiz::player_view(config, &mut rand::thread_rng());
    Ok(ok(QuizView {
        lesson_id,
        passing_score: config.passing_score,
        time_limit_minutes: config.time_limit_minutes,
        questions,
    }))
}
