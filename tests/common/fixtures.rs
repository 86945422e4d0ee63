use chrono::Utc;

use lms_backend::auth::hash_password;
use lms_backend::engine::types::{
    Course, Lesson, LessonKind, Question, QuestionKind, QuizConfig, Section,
};
use lms_backend::store::operations::tenants::Tenant;
use lms_backend::store::operations::users::{User, UserRole};
use lms_backend::store::Store;

pub fn seed_tenant(store: &Store, name: &str) -> Tenant {
    let now = Utc::now();
    let tenant = Tenant {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    store.create_tenant(&tenant).expect("create seed tenant");
    tenant
}

pub fn seed_user(store: &Store, email: &str, password: &str, tenant_id: &str, role: UserRole) -> User {
    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.to_string(),
        name: "Seed User".to_string(),
        password_hash: hash_password(password).expect("hash password"),
        role,
        tenant_id: tenant_id.to_string(),
        position: None,
        user_data: None,
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
    store.create_user(&user).expect("create seed user");
    user
}

pub fn text_lesson(id: &str, title: &str) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: title.to_string(),
        kind: LessonKind::Text,
        content: format!("<p>{title}</p>"),
        quiz: None,
        duration_minutes: 5,
        is_mandatory: true,
        is_preview: false,
    }
}

pub fn sample_quiz() -> QuizConfig {
    QuizConfig {
        passing_score: 70,
        max_attempts: Some(3),
        time_limit_minutes: Some(10),
        randomize_questions: false,
        questions: vec![
            Question {
                id: "q1".to_string(),
                text: "Which station plates the entremets?".to_string(),
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        "Garde manger".to_string(),
                        "Entremetier".to_string(),
                        "Saucier".to_string(),
                    ],
                    correct_answer: 1,
                },
                explanation: None,
                points: 10,
            },
            Question {
                id: "q2".to_string(),
                text: "Raw poultry is stored below ready-to-eat food.".to_string(),
                kind: QuestionKind::TrueFalse {
                    correct_answer: true,
                },
                explanation: Some("Drip contamination flows downward.".to_string()),
                points: 5,
            },
            Question {
                id: "q3".to_string(),
                text: "Name the five mother sauces' thickening base.".to_string(),
                kind: QuestionKind::ShortAnswer {
                    correct_answer: "roux".to_string(),
                },
                explanation: None,
                points: 5,
            },
        ],
    }
}

pub fn quiz_lesson(id: &str, title: &str) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: title.to_string(),
        kind: LessonKind::Quiz,
        content: String::new(),
        quiz: Some(sample_quiz()),
        duration_minutes: 10,
        is_mandatory: true,
        is_preview: false,
    }
}

/// Published three-lesson course: two text lessons then a quiz.
pub fn seed_course(store: &Store, tenant_id: &str) -> Course {
    let now = Utc::now();
    let course = Course {
        id: uuid::Uuid::new_v4().to_string(),
        tenant_id: tenant_id.to_string(),
        title: "Kitchen Onboarding".to_string(),
        description: "Stations, safety and service basics".to_string(),
        sections: vec![
            Section {
                id: "s1".to_string(),
                title: "Foundations".to_string(),
                lessons: vec![text_lesson("l1", "Stations"), text_lesson("l2", "Safety")],
            },
            Section {
                id: "s2".to_string(),
                title: "Check".to_string(),
                lessons: vec![quiz_lesson("l3", "Final Check")],
            },
        ],
        is_published: true,
        created_at: now,
        updated_at: now,
    };
    store.create_course(&course).expect("create seed course");
    course
}

/// Answers that score 100% on [`sample_quiz`].
pub fn all_correct_answers() -> serde_json::Value {
    serde_json::json!({
        "q1": 1,
        "q2": true,
        "q3": "roux",
    })
}

/// Answers that score 0% on [`sample_quiz`].
pub fn all_wrong_answers() -> serde_json::Value {
    serde_json::json!({
        "q1": 0,
        "q2": false,
        "q3": "slurry",
    })
}
