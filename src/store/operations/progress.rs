use crate::engine::types::UserProgress;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    /// Upsert: the tracker always produces a complete new snapshot, and
    /// retried saves are safe because completion is idempotent.
    pub fn save_progress(&self, progress: &UserProgress) -> Result<(), StoreError> {
        let key = keys::progress_key(&progress.user_id, &progress.course_id);
        self.progress
            .insert(key.as_bytes(), Self::serialize(progress)?)?;
        Ok(())
    }

    pub fn get_progress(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<UserProgress>, StoreError> {
        let key = keys::progress_key(user_id, course_id);
        match self.progress.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// All progress records of one user, across courses.
    pub fn list_user_progress(&self, user_id: &str) -> Result<Vec<UserProgress>, StoreError> {
        let prefix = keys::progress_user_prefix(user_id);
        let mut records = Vec::new();
        for item in self.progress.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            records.push(Self::deserialize::<UserProgress>(&value)?);
        }
        Ok(records)
    }

    pub fn count_progress_records(&self) -> Result<u64, StoreError> {
        Ok(self.progress.len() as u64)
    }
}
