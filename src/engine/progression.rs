//! Lesson progression: per-user, per-course completion state and the
//! sequential unlock rule. All functions return new snapshots; callers
//! persist complete records or nothing.

use chrono::{DateTime, Utc};

use crate::engine::types::{Course, ProgressStatus, UserProgress};
use crate::engine::EngineError;

/// Fresh progress record for a learner's first access to a course.
pub fn new_progress(
    user_id: &str,
    course: &Course,
    now: DateTime<Utc>,
) -> UserProgress {
    UserProgress {
        user_id: user_id.to_string(),
        course_id: course.id.clone(),
        status: ProgressStatus::NotStarted,
        progress_percentage: 0,
        completed_lessons: Vec::new(),
        current_lesson_id: course.flattened_lessons().next().map(|l| l.id.clone()),
        score: None,
        last_accessed_at: now,
        completed_at: None,
    }
}

/// Mark a lesson complete and return the updated snapshot.
///
/// Idempotent: completing an already-completed lesson returns the input
/// unchanged. The completed set only grows, the percentage never
/// decreases, and status never regresses. A quiz score, when given,
/// overwrites the course-level score (last write wins).
pub fn complete_lesson(
    progress: &UserProgress,
    course: &Course,
    lesson_id: &str,
    score: Option<u32>,
    now: DateTime<Utc>,
) -> Result<UserProgress, EngineError> {
    if progress.is_lesson_completed(lesson_id) {
        return Ok(progress.clone());
    }

    let index = course
        .lesson_index(lesson_id)
        .ok_or_else(|| EngineError::not_found("lesson", lesson_id))?;

    let mut next = progress.clone();
    next.completed_lessons.push(lesson_id.to_string());

    let total = course.lesson_count();
    next.progress_percentage = if total > 0 {
        ((next.completed_lessons.len() as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    // Advance the pointer to the following lesson in flattened order;
    // the last lesson keeps pointing at itself.
    next.current_lesson_id = course
        .flattened_lessons()
        .nth(index + 1)
        .map(|l| l.id.clone())
        .or_else(|| Some(lesson_id.to_string()));

    if next.progress_percentage >= 100 && total > 0 {
        next.status = ProgressStatus::Completed;
        if next.completed_at.is_none() {
            next.completed_at = Some(now);
        }
    } else {
        next.status = ProgressStatus::InProgress;
    }

    if score.is_some() {
        next.score = score;
    }
    next.last_accessed_at = now;

    Ok(next)
}

/// The unlock rule, evaluated per call and never stored: a lesson at
/// flattened index `i` is accessible iff it is a preview, already
/// completed, the current lesson, or `i <= completed_lessons.len()`.
/// Learners advance strictly sequentially; no skipping ahead.
pub fn is_lesson_unlocked(progress: &UserProgress, course: &Course, lesson_id: &str) -> bool {
    let Some(index) = course.lesson_index(lesson_id) else {
        return false;
    };
    let Some(lesson) = course.find_lesson(lesson_id) else {
        return false;
    };

    lesson.is_preview
        || progress.is_lesson_completed(lesson_id)
        || progress.current_lesson_id.as_deref() == Some(lesson_id)
        || index <= progress.completed_lessons.len()
}

/// Move the active-lesson pointer without completing anything. Only
/// unlocked lessons may be selected; revisiting a completed or current
/// lesson is always allowed.
pub fn select_lesson(
    progress: &UserProgress,
    course: &Course,
    lesson_id: &str,
    now: DateTime<Utc>,
) -> Result<UserProgress, EngineError> {
    if course.lesson_index(lesson_id).is_none() {
        return Err(EngineError::not_found("lesson", lesson_id));
    }
    if !is_lesson_unlocked(progress, course, lesson_id) {
        return Err(EngineError::LessonLocked {
            lesson_id: lesson_id.to_string(),
        });
    }

    let mut next = progress.clone();
    next.current_lesson_id = Some(lesson_id.to_string());
    next.last_accessed_at = now;
    Ok(next)
}
