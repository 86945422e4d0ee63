use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// A persisted access-token session. Keyed by the sha256 of the JWT so
/// raw tokens never touch disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Store {
    pub fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        let bytes = Self::serialize(session)?;
        self.sessions
            .insert(keys::session_key(&session.token_hash).as_bytes(), bytes)?;
        // Secondary index for listing/revoking a user's sessions
        self.sessions.insert(
            keys::session_user_index_key(&session.user_id, &session.token_hash)
                .as_bytes(),
            session.token_hash.as_bytes(),
        )?;
        Ok(())
    }

    pub fn get_session(&self, token_hash: &str) -> Result<Option<Session>, StoreError> {
        match self.sessions.get(keys::session_key(token_hash).as_bytes())? {
            Some(raw) => {
                let session: Session = Self::deserialize(&raw)?;
                if session.expires_at < Utc::now() {
                    return Ok(None);
                }
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    pub fn delete_session(&self, token_hash: &str) -> Result<(), StoreError> {
        if let Some(raw) = self.sessions.remove(keys::session_key(token_hash).as_bytes())? {
            let session: Session = Self::deserialize(&raw)?;
            self.sessions.remove(
                keys::session_user_index_key(&session.user_id, token_hash).as_bytes(),
            )?;
        }
        Ok(())
    }

    /// Revoke every session of one user. Returns how many were removed.
    pub fn delete_user_sessions(&self, user_id: &str) -> Result<usize, StoreError> {
        let prefix = keys::session_user_prefix(user_id);
        let mut hashes = Vec::new();
        for item in self.sessions.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            hashes.push((key.to_vec(), value.to_vec()));
        }
        for (index_key, hash) in &hashes {
            self.sessions.remove(index_key.as_slice())?;
            if let Ok(hash_str) = std::str::from_utf8(hash) {
                self.sessions
                    .remove(keys::session_key(hash_str).as_bytes())?;
            }
        }
        Ok(hashes.len())
    }

    /// Keep at most `max` sessions per user, evicting the oldest.
    pub fn cleanup_oldest_user_sessions(
        &self,
        user_id: &str,
        max: usize,
    ) -> Result<usize, StoreError> {
        let prefix = keys::session_user_prefix(user_id);
        let mut sessions = Vec::new();
        for item in self.sessions.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let Ok(hash) = String::from_utf8(value.to_vec()) else {
                continue;
            };
            if let Some(raw) = self.sessions.get(keys::session_key(&hash).as_bytes())? {
                let session: Session = Self::deserialize(&raw)?;
                sessions.push(session);
            }
        }

        if sessions.len() < max {
            return Ok(0);
        }

        // Evict enough of the oldest that one new session still fits
        sessions.sort_by_key(|s| s.created_at);
        let excess = sessions.len() + 1 - max;
        for session in sessions.iter().take(excess) {
            self.delete_session(&session.token_hash)?;
        }
        Ok(excess)
    }

    /// Drop sessions past their expiry. Returns how many were removed.
    pub fn cleanup_expired_sessions(&self) -> Result<usize, StoreError> {
        let now = Utc::now();
        let mut expired = Vec::new();
        for item in self.sessions.iter() {
            let (key, value) = item?;
            if key.starts_with(b"user:") {
                continue;
            }
            let session: Session = Self::deserialize(&value)?;
            if session.expires_at < now {
                expired.push(session.token_hash);
            }
        }
        for hash in &expired {
            self.delete_session(hash)?;
        }
        Ok(expired.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tempfile::tempdir;

    use super::*;

    fn session(token_hash: &str, user_id: &str, ttl_hours: i64) -> Session {
        Session {
            token_hash: token_hash.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(ttl_hours),
        }
    }

    #[test]
    fn expired_session_is_invisible() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("sess-db").to_str().unwrap()).unwrap();

        store.create_session(&session("h1", "u1", -1)).unwrap();
        assert!(store.get_session("h1").unwrap().is_none());
    }

    #[test]
    fn delete_user_sessions_revokes_all() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("sess-db2").to_str().unwrap()).unwrap();

        store.create_session(&session("h1", "u1", 1)).unwrap();
        store.create_session(&session("h2", "u1", 1)).unwrap();
        store.create_session(&session("h3", "u2", 1)).unwrap();

        let removed = store.delete_user_sessions("u1").unwrap();
        assert_eq!(removed, 2);
        assert!(store.get_session("h1").unwrap().is_none());
        assert!(store.get_session("h3").unwrap().is_some());
    }

    #[test]
    fn cleanup_expired_removes_only_stale() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("sess-db3").to_str().unwrap()).unwrap();

        store.create_session(&session("h1", "u1", -2)).unwrap();
        store.create_session(&session("h2", "u1", 2)).unwrap();

        let removed = store.cleanup_expired_sessions().unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_session("h2").unwrap().is_some());
    }
}
