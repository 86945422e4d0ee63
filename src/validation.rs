//! 公共验证函数模块
//! 密码、邮箱、姓名等输入验证，以及课程结构的创作期校验。

use crate::constants::{MAX_COURSE_LESSONS, MAX_QUIZ_QUESTIONS};
use crate::engine::types::{Course, LessonKind, QuestionKind, QuizConfig};

/// 至少 8 字符、最多 256 字符，需包含大小写字母和数字
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if password.len() > 256 {
        return Err("Password must be at most 256 characters");
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_upper || !has_lower || !has_digit {
        return Err("Password must contain an uppercase letter, a lowercase letter and a digit");
    }
    Ok(())
}

/// user@domain.tld 形式的基本格式检查
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let parts: Vec<&str> = email.splitn(2, '@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if !local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'+' || b == b'-')
    {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    if !domain
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        return false;
    }
    domain
        .split('.')
        .all(|part| !part.is_empty() && !part.starts_with('-') && !part.ends_with('-'))
}

/// 显示名：2-80 字符，允许字母、数字、下划线、连字符、撇号和空格
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let char_count = name.chars().count();
    if char_count < 2 || char_count > 80 {
        return Err("Name must be between 2 and 80 characters");
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '\'' || c == ' ')
    {
        return Err("Name contains invalid characters");
    }
    Ok(())
}

/// Authoring-time checks for a quiz definition. Runtime grading treats a
/// quiz as data and never re-validates; bad definitions are rejected here.
pub fn validate_quiz_config(quiz: &QuizConfig) -> Result<(), String> {
    if quiz.passing_score > 100 {
        return Err(format!(
            "passingScore must be in [0, 100], got {}",
            quiz.passing_score
        ));
    }
    if quiz.max_attempts == Some(0) {
        return Err("maxAttempts must be at least 1 when set".to_string());
    }
    if quiz.questions.len() > MAX_QUIZ_QUESTIONS {
        return Err(format!(
            "quiz has {} questions, maximum is {}",
            quiz.questions.len(),
            MAX_QUIZ_QUESTIONS
        ));
    }
    for question in &quiz.questions {
        if question.id.trim().is_empty() {
            return Err("question id must not be empty".to_string());
        }
        if question.points == 0 {
            return Err(format!("question {} must be worth at least 1 point", question.id));
        }
        if let QuestionKind::MultipleChoice {
            options,
            correct_answer,
        } = &question.kind
        {
            if options.len() < 2 {
                return Err(format!(
                    "question {} needs at least two options",
                    question.id
                ));
            }
            if *correct_answer >= options.len() {
                return Err(format!(
                    "question {} correctAnswer index {} is out of range",
                    question.id, correct_answer
                ));
            }
        }
    }
    Ok(())
}

/// Structural checks for a whole course: non-empty title, bounded lesson
/// count, unique lesson ids, quiz config present exactly on quiz lessons.
pub fn validate_course(course: &Course) -> Result<(), String> {
    if course.title.trim().is_empty() {
        return Err("course title must not be empty".to_string());
    }
    let total = course.lesson_count();
    if total > MAX_COURSE_LESSONS {
        return Err(format!(
            "course has {} lessons, maximum is {}",
            total, MAX_COURSE_LESSONS
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for lesson in course.flattened_lessons() {
        if lesson.id.trim().is_empty() {
            return Err("lesson id must not be empty".to_string());
        }
        if !seen.insert(lesson.id.as_str()) {
            return Err(format!("duplicate lesson id: {}", lesson.id));
        }
        match (lesson.kind, &lesson.quiz) {
            (LessonKind::Quiz, None) => {
                return Err(format!("quiz lesson {} is missing its quiz", lesson.id));
            }
            (LessonKind::Quiz, Some(quiz)) => validate_quiz_config(quiz)?,
            (_, Some(_)) => {
                return Err(format!(
                    "lesson {} is not a quiz but carries a quiz config",
                    lesson.id
                ));
            }
            _ => {}
        }
    }
    Ok(())
}
