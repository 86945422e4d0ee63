use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A quiz question. The correct answer is a tagged union keyed by the
/// question type, so grading branches on the tag instead of loose equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        /// Index into `options`.
        correct_answer: usize,
    },
    TrueFalse {
        correct_answer: bool,
    },
    ShortAnswer {
        correct_answer: String,
    },
}

impl QuestionKind {
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice { .. } => "multiple_choice",
            Self::TrueFalse { .. } => "true_false",
            Self::ShortAnswer { .. } => "short_answer",
        }
    }
}

/// An answer as submitted by the learner. Shape depends on the question
/// type; a shape mismatch is graded as incorrect, never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAnswer {
    Bool(bool),
    Index(usize),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    /// Percentage threshold in [0, 100].
    pub passing_score: u32,
    /// Unlimited attempts when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    #[serde(default)]
    pub randomize_questions: bool,
    pub questions: Vec<Question>,
}

/// Result of grading one attempt. Computed, never stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGrade {
    pub earned_points: u32,
    pub total_points: u32,
    /// Rounded half away from zero to the nearest integer in [0, 100].
    pub score_percentage: u32,
    pub passed: bool,
    pub question_results: Vec<QuestionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: String,
    pub correct: bool,
    pub points_awarded: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Video,
    Text,
    Pdf,
    Quiz,
    Presentation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    /// URL or HTML payload depending on `kind`.
    #[serde(default)]
    pub content: String,
    /// Present iff `kind` is `Quiz`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizConfig>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub is_mandatory: bool,
    /// Preview lessons are accessible without prior completion.
    #[serde(default)]
    pub is_preview: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub tenant_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// All lessons in section order then lesson order. This flattened
    /// order defines the prerequisite/unlock sequence.
    pub fn flattened_lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.sections.iter().flat_map(|s| s.lessons.iter())
    }

    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    pub fn find_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.flattened_lessons().find(|l| l.id == lesson_id)
    }

    /// Index of a lesson in flattened order.
    pub fn lesson_index(&self, lesson_id: &str) -> Option<usize> {
        self.flattened_lessons().position(|l| l.id == lesson_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Per-user, per-course completion state. One record per
/// `(user_id, course_id)` pair, created on first lesson access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub course_id: String,
    /// Monotonic: not_started -> in_progress -> completed, never back.
    pub status: ProgressStatus,
    /// Derived: round(completed / total * 100).
    pub progress_percentage: u32,
    /// Grow-only set of lesson ids, in completion order.
    pub completed_lessons: Vec<String>,
    pub current_lesson_id: Option<String>,
    /// Last quiz score in this course; a later quiz overwrites an earlier one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    pub last_accessed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl UserProgress {
    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|l| l == lesson_id)
    }
}

/// One tier of the points ladder. The catalog is ordered by `min_points`
/// ascending; the last level's range is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub level: u32,
    pub name: String,
    pub min_points: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub current_level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level: Option<Level>,
    /// Progress through the current level's range, clamped to [0, 100].
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRequirementKind {
    CoursesCompleted,
    StreakDays,
    PointsEarned,
    PerfectScore,
}

/// Static catalog entry. Awards are one-way; an earned badge is never
/// revoked even if the underlying statistic later regresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub requirement_type: BadgeRequirementKind,
    pub requirement_value: u64,
}

/// Aggregated per-user counters consumed by the badge evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub completed_courses: u64,
    pub perfect_scores: u64,
}

/// Snapshot of a learner's gamification fields, as seen by the pure
/// evaluators. The caller owns loading and persisting the user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerSnapshot {
    pub points: u64,
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_learning_date: Option<NaiveDate>,
    pub badges: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_lesson(id: &str) -> Lesson {
        Lesson {
            id: id.to_string(),
            title: "Food safety check".to_string(),
            kind: LessonKind::Quiz,
            content: String::new(),
            quiz: Some(QuizConfig {
                passing_score: 70,
                max_attempts: Some(3),
                time_limit_minutes: None,
                randomize_questions: false,
                questions: vec![Question {
                    id: "q1".to_string(),
                    text: "Allergens must be declared".to_string(),
                    kind: QuestionKind::TrueFalse {
                        correct_answer: true,
                    },
                    explanation: None,
                    points: 10,
                }],
            }),
            duration_minutes: 5,
            is_mandatory: true,
            is_preview: false,
        }
    }

    #[test]
    fn question_wire_format_is_tagged_by_type() {
        let q = Question {
            id: "q1".to_string(),
            text: "Pick one".to_string(),
            kind: QuestionKind::MultipleChoice {
                options: vec!["a".to_string(), "b".to_string()],
                correct_answer: 1,
            },
            explanation: None,
            points: 5,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "multiple_choice");
        assert_eq!(json["correctAnswer"], 1);
        assert_eq!(json["options"][1], "b");
    }

    #[test]
    fn submitted_answer_keeps_json_shape() {
        let b: SubmittedAnswer = serde_json::from_str("true").unwrap();
        let i: SubmittedAnswer = serde_json::from_str("2").unwrap();
        let t: SubmittedAnswer = serde_json::from_str("\"Paris\"").unwrap();
        assert_eq!(b, SubmittedAnswer::Bool(true));
        assert_eq!(i, SubmittedAnswer::Index(2));
        assert_eq!(t, SubmittedAnswer::Text("Paris".to_string()));
    }

    #[test]
    fn flattened_order_spans_sections() {
        let course = Course {
            id: "c1".to_string(),
            tenant_id: "t1".to_string(),
            title: "Onboarding".to_string(),
            description: String::new(),
            sections: vec![
                Section {
                    id: "s1".to_string(),
                    title: "Basics".to_string(),
                    lessons: vec![quiz_lesson("l1"), quiz_lesson("l2")],
                },
                Section {
                    id: "s2".to_string(),
                    title: "Advanced".to_string(),
                    lessons: vec![quiz_lesson("l3")],
                },
            ],
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(course.lesson_count(), 3);
        assert_eq!(course.lesson_index("l3"), Some(2));
        assert!(course.find_lesson("missing").is_none());
    }

    #[test]
    fn quiz_config_serde_roundtrip() {
        let lesson = quiz_lesson("l1");
        let encoded = serde_json::to_string(&lesson).unwrap();
        let decoded: Lesson = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, lesson);
    }

    #[test]
    fn status_ordering_matches_lifecycle() {
        assert!(ProgressStatus::NotStarted < ProgressStatus::InProgress);
        assert!(ProgressStatus::InProgress < ProgressStatus::Completed);
    }
}
