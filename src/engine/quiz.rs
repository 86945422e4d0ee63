//! Quiz grading: pure scoring of a single attempt from question
//! definitions and submitted answers. No partial credit, no fuzzy matching.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::engine::types::{
    Question, QuestionKind, QuestionResult, QuizConfig, QuizGrade, SubmittedAnswer,
};

/// Grade one attempt. Unanswered questions are incorrect but still count
/// toward the total. An empty question list yields score 0, not an error.
/// Attempt limits are an orchestrator concern and are never checked here.
pub fn grade(config: &QuizConfig, answers: &HashMap<String, SubmittedAnswer>) -> QuizGrade {
    let mut earned_points = 0u32;
    let mut total_points = 0u32;
    let mut question_results = Vec::with_capacity(config.questions.len());

    for question in &config.questions {
        total_points += question.points;
        let correct = answers
            .get(&question.id)
            .map(|answer| is_correct(&question.kind, answer))
            .unwrap_or(false);
        let points_awarded = if correct { question.points } else { 0 };
        earned_points += points_awarded;
        question_results.push(QuestionResult {
            question_id: question.id.clone(),
            correct,
            points_awarded,
        });
    }

    let score_percentage = if total_points > 0 {
        // f64::round is round-half-away-from-zero, as required
        ((earned_points as f64 / total_points as f64) * 100.0).round() as u32
    } else {
        0
    };

    QuizGrade {
        earned_points,
        total_points,
        score_percentage,
        passed: score_percentage >= config.passing_score,
        question_results,
    }
}

/// Strict type+value equality: a submitted answer of the wrong shape for
/// the question type is simply incorrect.
fn is_correct(kind: &QuestionKind, answer: &SubmittedAnswer) -> bool {
    match (kind, answer) {
        (QuestionKind::MultipleChoice { correct_answer, .. }, SubmittedAnswer::Index(i)) => {
            i == correct_answer
        }
        (QuestionKind::TrueFalse { correct_answer }, SubmittedAnswer::Bool(b)) => {
            b == correct_answer
        }
        (QuestionKind::ShortAnswer { correct_answer }, SubmittedAnswer::Text(t)) => {
            normalize(t) == normalize(correct_answer)
        }
        _ => false,
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A question as served to the learner: no correct answer, no explanation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub points: u32,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        let options = match &q.kind {
            QuestionKind::MultipleChoice { options, .. } => Some(options.clone()),
            _ => None,
        };
        Self {
            id: q.id.clone(),
            text: q.text.clone(),
            question_type: q.kind.type_str(),
            options,
            points: q.points,
        }
    }
}

/// Questions in presentation order, shuffled per attempt when the config
/// asks for it. The rng is injected so the shuffle stays testable.
pub fn player_view<R: Rng>(config: &QuizConfig, rng: &mut R) -> Vec<QuestionView> {
    let mut views: Vec<QuestionView> = config.questions.iter().map(QuestionView::from).collect();
    if config.randomize_questions {
        views.shuffle(rng);
    }
    views
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn two_question_config(passing_score: u32) -> QuizConfig {
        QuizConfig {
            passing_score,
            max_attempts: None,
            time_limit_minutes: None,
            randomize_questions: false,
            questions: vec![
                Question {
                    id: "q1".to_string(),
                    text: "Capital of France".to_string(),
                    kind: QuestionKind::ShortAnswer {
                        correct_answer: "Paris".to_string(),
                    },
                    explanation: None,
                    points: 10,
                },
                Question {
                    id: "q2".to_string(),
                    text: "2 is even".to_string(),
                    kind: QuestionKind::TrueFalse {
                        correct_answer: true,
                    },
                    explanation: None,
                    points: 10,
                },
            ],
        }
    }

    fn answers(pairs: &[(&str, SubmittedAnswer)]) -> HashMap<String, SubmittedAnswer> {
        pairs
            .iter()
            .map(|(id, a)| (id.to_string(), a.clone()))
            .collect()
    }

    #[test]
    fn perfect_score_passes() {
        let config = two_question_config(100);
        let grade = grade(
            &config,
            &answers(&[
                ("q1", SubmittedAnswer::Text("Paris".to_string())),
                ("q2", SubmittedAnswer::Bool(true)),
            ]),
        );
        assert_eq!(grade.earned_points, 20);
        assert_eq!(grade.total_points, 20);
        assert_eq!(grade.score_percentage, 100);
        assert!(grade.passed);
    }

    #[test]
    fn short_answer_is_case_and_whitespace_insensitive() {
        let config = two_question_config(50);
        let result = grade(
            &config,
            &answers(&[("q1", SubmittedAnswer::Text("  paris ".to_string()))]),
        );
        assert!(result.question_results[0].correct);
        assert_eq!(result.earned_points, 10);
    }

    #[test]
    fn unanswered_questions_count_against_total() {
        let config = two_question_config(60);
        let result = grade(&config, &HashMap::new());
        assert_eq!(result.earned_points, 0);
        assert_eq!(result.total_points, 20);
        assert_eq!(result.score_percentage, 0);
        assert!(!result.passed);
    }

    #[test]
    fn wrong_answer_shape_is_incorrect_not_an_error() {
        let config = two_question_config(50);
        // Boolean submitted for a short-answer question
        let result = grade(&config, &answers(&[("q1", SubmittedAnswer::Bool(true))]));
        assert!(!result.question_results[0].correct);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let config = QuizConfig {
            passing_score: 0,
            max_attempts: None,
            time_limit_minutes: None,
            randomize_questions: false,
            questions: vec![],
        };
        let result = grade(&config, &HashMap::new());
        assert_eq!(result.score_percentage, 0);
        // passing_score of 0 still passes an empty quiz
        assert!(result.passed);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let config = QuizConfig {
            passing_score: 0,
            max_attempts: None,
            time_limit_minutes: None,
            randomize_questions: false,
            questions: vec![
                Question {
                    id: "q1".to_string(),
                    text: "a".to_string(),
                    kind: QuestionKind::TrueFalse {
                        correct_answer: true,
                    },
                    explanation: None,
                    points: 1,
                },
                Question {
                    id: "q2".to_string(),
                    text: "b".to_string(),
                    kind: QuestionKind::TrueFalse {
                        correct_answer: true,
                    },
                    explanation: None,
                    points: 7,
                },
            ],
        };
        // 1 of 8 points = 12.5% -> rounds to 13
        let result = grade(&config, &answers(&[("q1", SubmittedAnswer::Bool(true))]));
        assert_eq!(result.score_percentage, 13);
    }

    #[test]
    fn multiple_choice_requires_exact_index() {
        let config = QuizConfig {
            passing_score: 100,
            max_attempts: None,
            time_limit_minutes: None,
            randomize_questions: false,
            questions: vec![Question {
                id: "q1".to_string(),
                text: "Pick".to_string(),
                kind: QuestionKind::MultipleChoice {
                    options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                    correct_answer: 2,
                },
                explanation: None,
                points: 4,
            }],
        };
        let wrong = grade(&config, &answers(&[("q1", SubmittedAnswer::Index(1))]));
        let right = grade(&config, &answers(&[("q1", SubmittedAnswer::Index(2))]));
        assert!(!wrong.passed);
        assert!(right.passed);
    }

    #[test]
    fn player_view_hides_answers_and_respects_shuffle_flag() {
        let mut config = two_question_config(50);
        let mut rng = StdRng::seed_from_u64(7);

        let ordered = player_view(&config, &mut rng);
        assert_eq!(ordered[0].id, "q1");
        let json = serde_json::to_string(&ordered).unwrap();
        assert!(!json.contains("correctAnswer"));

        config.randomize_questions = true;
        let ids: Vec<String> = (0..20)
            .flat_map(|_| player_view(&config, &mut rng))
            .map(|v| v.id)
            .collect();
        // With 20 shuffles of 2 questions, both orders must appear
        assert!(ids.windows(2).any(|w| w[0] == "q2"));
    }
}
