//! Glue between the pure progression/gamification functions and the
//! persistence layer. All clock reads and store writes happen here so
//! the pure modules stay deterministic.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::config::GamificationConfig;
use crate::engine::types::{
    Badge, Course, LearnerSnapshot, LessonKind, LevelInfo, QuizGrade, UserProgress, UserStats,
};
use crate::engine::{badges, leveling, progression, quiz, streak, EngineError};
use crate::store::operations::quiz_attempts::QuizAttempt;
use crate::store::Store;

/// What one learning action changed in the learner's gamification state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationDelta {
    pub points_awarded: u64,
    pub total_points: u64,
    pub streak: u32,
    pub level: u32,
    pub new_badges: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub progress: UserProgress,
    pub course_completed: bool,
    /// Absent when the completion was a repeat (idempotent no-op).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamification: Option<GamificationDelta>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub grade: QuizGrade,
    pub attempt_number: u32,
    /// None when the quiz allows unlimited attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
    pub course_completed: bool,
    pub progress: UserProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamification: Option<GamificationDelta>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonOverview {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    pub duration_minutes: u32,
    pub is_mandatory: bool,
    pub is_preview: bool,
    pub completed: bool,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub progress: UserProgress,
    pub lessons: Vec<LessonOverview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationSummary {
    pub points: u64,
    pub streak: u32,
    pub level: LevelInfo,
    pub badges: Vec<Badge>,
    pub stats: UserStats,
}

#[derive(Clone)]
pub struct LearningEngine {
    store: Arc<Store>,
    config: GamificationConfig,
}

impl LearningEngine {
    pub fn new(store: Arc<Store>, config: GamificationConfig) -> Self {
        Self { store, config }
    }

    /// Load the progress record for `(user, course)`, creating a fresh
    /// one on first access. The course must exist.
    pub fn load_or_create_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<(Course, UserProgress), EngineError> {
        let course = self
            .store
            .get_course(course_id)?
            .ok_or_else(|| EngineError::not_found("course", course_id))?;

        let progress = match self.store.get_progress(user_id, course_id)? {
            Some(existing) => existing,
            None => {
                let fresh = progression::new_progress(user_id, &course, Utc::now());
                self.store.save_progress(&fresh)?;
                fresh
            }
        };

        Ok((course, progress))
    }

    /// Per-lesson completion and unlock flags for the course player. The
    /// unlock rule is evaluated here, never stored.
    pub fn progress_overview(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<ProgressOverview, EngineError> {
        let (course, progress) = self.load_or_create_progress(user_id, course_id)?;

        let lessons = course
            .flattened_lessons()
            .map(|lesson| LessonOverview {
                id: lesson.id.clone(),
                title: lesson.title.clone(),
                kind: lesson.kind,
                duration_minutes: lesson.duration_minutes,
                is_mandatory: lesson.is_mandatory,
                is_preview: lesson.is_preview,
                completed: progress.is_lesson_completed(&lesson.id),
                unlocked: progression::is_lesson_unlocked(&progress, &course, &lesson.id),
            })
            .collect();

        Ok(ProgressOverview { progress, lessons })
    }

    pub fn select_lesson(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<UserProgress, EngineError> {
        let (course, progress) = self.load_or_create_progress(user_id, course_id)?;
        let updated = progression::select_lesson(&progress, &course, lesson_id, Utc::now())?;
        self.store.save_progress(&updated)?;
        Ok(updated)
    }

    /// Mark a non-quiz lesson completed. Quiz lessons are completed by
    /// submitting the quiz. Repeated calls are no-ops that award nothing.
    pub fn complete_lesson(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<CompletionOutcome, EngineError> {
        let (course, progress) = self.load_or_create_progress(user_id, course_id)?;
        let lesson = course
            .find_lesson(lesson_id)
            .ok_or_else(|| EngineError::not_found("lesson", lesson_id))?;

        if lesson.kind == LessonKind::Quiz {
            return Err(EngineError::Validation(
                "quiz lessons are completed by submitting the quiz".to_string(),
            ));
        }
        if !progression::is_lesson_unlocked(&progress, &course, lesson_id) {
            return Err(EngineError::LessonLocked {
                lesson_id: lesson_id.to_string(),
            });
        }

        let already_completed = progress.is_lesson_completed(lesson_id);
        let was_course_completed = progress.completed_at.is_some();
        let updated = progression::complete_lesson(&progress, &course, lesson_id, None, Utc::now())?;
        self.store.save_progress(&updated)?;

        let course_completed = updated.completed_at.is_some() && !was_course_completed;
        let gamification = if already_completed {
            None
        } else {
            let mut points = self.config.points_per_lesson;
            if course_completed {
                points += self.config.course_completion_bonus;
            }
            Some(self.apply_gamification(user_id, points, course_completed, false)?)
        };

        Ok(CompletionOutcome {
            progress: updated,
            course_completed,
            gamification,
        })
    }

    /// Grade a quiz attempt and persist its consequences. The attempt
    /// count from the store enforces `max_attempts` before grading runs;
    /// the grader never sees it.
    pub fn submit_quiz(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
        answers: &HashMap<String, crate::engine::types::SubmittedAnswer>,
    ) -> Result<QuizOutcome, EngineError> {
        let (course, progress) = self.load_or_create_progress(user_id, course_id)?;
        let lesson = course
            .find_lesson(lesson_id)
            .ok_or_else(|| EngineError::not_found("lesson", lesson_id))?;
        let quiz_config = lesson.quiz.as_ref().ok_or_else(|| {
            EngineError::Validation(format!("lesson {} is not a quiz", lesson_id))
        })?;

        if !progression::is_lesson_unlocked(&progress, &course, lesson_id) {
            return Err(EngineError::LessonLocked {
                lesson_id: lesson_id.to_string(),
            });
        }

        let prior_attempts = self.store.count_quiz_attempts(user_id, lesson_id)?;
        if let Some(max) = quiz_config.max_attempts {
            if prior_attempts >= max {
                return Err(EngineError::AttemptsExhausted {
                    lesson_id: lesson_id.to_string(),
                    max,
                });
            }
        }

        let grade = quiz::grade(quiz_config, answers);
        let attempt_number = prior_attempts + 1;

        self.store.record_quiz_attempt(&QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            lesson_id: lesson_id.to_string(),
            attempt_number,
            earned_points: grade.earned_points,
            total_points: grade.total_points,
            score_percentage: grade.score_percentage,
            passed: grade.passed,
            submitted_at: Utc::now(),
        })?;

        let attempts_remaining = quiz_config
            .max_attempts
            .map(|max| max.saturating_sub(attempt_number));

        if !grade.passed {
            // A failed attempt earns nothing, but it is still a learning
            // session: the day counts toward the streak.
            self.record_learning_day(user_id)?;
            return Ok(QuizOutcome {
                grade,
                attempt_number,
                attempts_remaining,
                course_completed: false,
                progress,
                gamification: None,
            });
        }

        let already_completed = progress.is_lesson_completed(lesson_id);
        let was_course_completed = progress.completed_at.is_some();
        let updated = progression::complete_lesson(
            &progress,
            &course,
            lesson_id,
            Some(grade.score_percentage),
            Utc::now(),
        )?;
        self.store.save_progress(&updated)?;

        let course_completed = updated.completed_at.is_some() && !was_course_completed;
        let gamification = if already_completed {
            None
        } else {
            let mut points = u64::from(grade.earned_points);
            if course_completed {
                points += self.config.course_completion_bonus;
            }
            let perfect = grade.score_percentage >= 100;
            Some(self.apply_gamification(user_id, points, course_completed, perfect)?)
        };

        Ok(QuizOutcome {
            grade,
            attempt_number,
            attempts_remaining,
            course_completed,
            progress: updated,
            gamification,
        })
    }

    pub fn gamification_summary(&self, user_id: &str) -> Result<GamificationSummary, EngineError> {
        let user = self
            .store
            .get_user_by_id(user_id)?
            .ok_or_else(|| EngineError::not_found("user", user_id))?;
        let levels = self.store.list_levels()?;
        let level = leveling::level_info(user.points, &levels)?;
        let stats = self.store.get_user_stats(user_id)?;

        let catalog = self.store.list_badges()?;
        let badges = catalog
            .into_iter()
            .filter(|b| user.badges.iter().any(|held| held == &b.id))
            .collect();

        Ok(GamificationSummary {
            points: user.points,
            streak: user.streak,
            level,
            badges,
            stats,
        })
    }

    /// Advance the streak for today without touching points or badges.
    fn record_learning_day(&self, user_id: &str) -> Result<(), EngineError> {
        let mut user = self
            .store
            .get_user_by_id(user_id)?
            .ok_or_else(|| EngineError::not_found("user", user_id))?;
        let update = streak::record_activity(
            user.streak,
            user.last_learning_date,
            Utc::now().date_naive(),
        );
        user.streak = update.streak;
        user.last_learning_date = update.last_learning_date;
        user.updated_at = Utc::now();
        self.store.update_user(&user)?;
        Ok(())
    }

    /// Apply one learning action's rewards to the user record: add the
    /// points, advance the streak for today, bump the statistic counters,
    /// award any newly-earned badges and refresh the cached level.
    fn apply_gamification(
        &self,
        user_id: &str,
        points_awarded: u64,
        course_completed: bool,
        perfect_score: bool,
    ) -> Result<GamificationDelta, EngineError> {
        let mut user = self
            .store
            .get_user_by_id(user_id)?
            .ok_or_else(|| EngineError::not_found("user", user_id))?;

        user.points = user.points.saturating_add(points_awarded);

        // Streaks count UTC calendar days, whatever the caller's zone.
        let update = streak::record_activity(
            user.streak,
            user.last_learning_date,
            Utc::now().date_naive(),
        );
        user.streak = update.streak;
        user.last_learning_date = update.last_learning_date;

        let mut stats = self.store.get_user_stats(user_id)?;
        if course_completed {
            stats.completed_courses += 1;
        }
        if perfect_score {
            stats.perfect_scores += 1;
        }
        self.store.save_user_stats(user_id, &stats)?;

        let snapshot = LearnerSnapshot {
            points: user.points,
            streak: user.streak,
            last_learning_date: user.last_learning_date,
            badges: user.badges.clone(),
        };
        let catalog = self.store.list_badges()?;
        let new_badges = badges::evaluate(&snapshot, &stats, &catalog);
        user.badges.extend(new_badges.iter().cloned());

        let levels = self.store.list_levels()?;
        let level = leveling::level_info(user.points, &levels)?;
        user.level = level.current_level.level;

        user.updated_at = Utc::now();
        self.store.update_user(&user)?;

        if !new_badges.is_empty() {
            tracing::info!(user_id, badges = ?new_badges, "Badges awarded");
        }

        Ok(GamificationDelta {
            points_awarded,
            total_points: user.points,
            streak: user.streak,
            level: user.level,
            new_badges,
        })
    }
}
