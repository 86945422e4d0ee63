pub mod badges;
pub mod leveling;
pub mod orchestrator;
pub mod progression;
pub mod quiz;
pub mod streak;
pub mod types;

use thiserror::Error;

use crate::store::StoreError;

/// Error taxonomy of the progression/gamification engine.
///
/// `Configuration` is fatal misconfiguration (e.g. an empty level catalog)
/// and is never silently defaulted. `Validation` is rejected at course
/// authoring time, not at grading time. The pure components never perform
/// I/O; `Store` only appears when the orchestrator persists snapshots.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("lesson locked: {lesson_id}")]
    LessonLocked { lesson_id: String },
    #[error("quiz attempts exhausted: lesson={lesson_id}, max={max}")]
    AttemptsExhausted { lesson_id: String, max: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn not_found(entity: &str, key: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }
}
