pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub users: sled::Tree,
    pub sessions: sled::Tree,
    pub tenants: sled::Tree,
    pub courses: sled::Tree,
    pub progress: sled::Tree,
    pub quiz_attempts: sled::Tree,
    pub announcements: sled::Tree,
    pub user_stats: sled::Tree,
    pub config_versions: sled::Tree,
    pub levels: sled::Tree,
    pub badges: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let users = db.open_tree(trees::USERS)?;
        let sessions = db.open_tree(trees::SESSIONS)?;
        let tenants = db.open_tree(trees::TENANTS)?;
        let courses = db.open_tree(trees::COURSES)?;
        let progress = db.open_tree(trees::PROGRESS)?;
        let quiz_attempts = db.open_tree(trees::QUIZ_ATTEMPTS)?;
        let announcements = db.open_tree(trees::ANNOUNCEMENTS)?;
        let user_stats = db.open_tree(trees::USER_STATS)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let levels = db.open_tree(trees::LEVELS)?;
        let badges = db.open_tree(trees::BADGES)?;

        Ok(Self {
            db,
            users,
            sessions,
            tenants,
            courses,
            progress,
            quiz_attempts,
            announcements,
            user_stats,
            config_versions,
            levels,
            badges,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
