use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// One graded quiz attempt. The attempt count derived from these records
/// is what enforces `max_attempts`; the grader itself never checks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub lesson_id: String,
    pub attempt_number: u32,
    pub earned_points: u32,
    pub total_points: u32,
    pub score_percentage: u32,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

impl Store {
    pub fn record_quiz_attempt(&self, attempt: &QuizAttempt) -> Result<(), StoreError> {
        let key = keys::quiz_attempt_key(
            &attempt.user_id,
            &attempt.lesson_id,
            attempt.submitted_at.timestamp_millis(),
            &attempt.id,
        );
        self.quiz_attempts
            .insert(key.as_bytes(), Self::serialize(attempt)?)?;
        Ok(())
    }

    pub fn count_quiz_attempts(&self, user_id: &str, lesson_id: &str) -> Result<u32, StoreError> {
        let prefix = keys::quiz_attempt_prefix(user_id, lesson_id);
        let mut count = 0u32;
        for item in self.quiz_attempts.scan_prefix(prefix.as_bytes()) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Attempts for one (user, lesson), newest first.
    pub fn list_quiz_attempts(
        &self,
        user_id: &str,
        lesson_id: &str,
        limit: usize,
    ) -> Result<Vec<QuizAttempt>, StoreError> {
        let prefix = keys::quiz_attempt_prefix(user_id, lesson_id);
        let mut attempts = Vec::new();
        for item in self.quiz_attempts.scan_prefix(prefix.as_bytes()).take(limit) {
            let (_, value) = item?;
            attempts.push(Self::deserialize::<QuizAttempt>(&value)?);
        }
        Ok(attempts)
    }
}
