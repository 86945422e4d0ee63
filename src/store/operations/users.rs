use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Staff,
    Manager,
    Admin,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// A platform user. Identity and learner profile live in one record so
/// provisioning is a single atomic insert (no auth/profile split to
/// roll back).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Opaque extra fields supplied at provisioning time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<serde_json::Value>,
    pub is_active: bool,

    // Gamification fields; points and badges only ever grow, level is a
    // cached derivation of points.
    pub points: u64,
    pub level: u32,
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_learning_date: Option<NaiveDate>,
    #[serde(default)]
    pub badges: Vec<String>,

    #[serde(default)]
    pub failed_login_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let email_key = keys::user_email_index_key(&user.email);

        // Atomic compare-and-swap on the email index: two concurrent
        // provisioning calls with the same email cannot both win.
        let cas_result = self
            .users
            .compare_and_swap(
                email_key.as_bytes(),
                None::<&[u8]>,
                Some(user.id.as_bytes().to_vec()),
            )
            .map_err(StoreError::Sled)?;

        if cas_result.is_err() {
            return Err(StoreError::Conflict {
                entity: "user_email".to_string(),
                key: user.email.clone(),
            });
        }

        let user_key = keys::user_key(&user.id);
        let user_bytes = Self::serialize(user)?;
        if let Err(e) = self.users.insert(user_key.as_bytes(), user_bytes) {
            let _ = self.users.remove(email_key.as_bytes());
            return Err(StoreError::Sled(e));
        }

        Ok(())
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let key = keys::user_key(user_id);
        match self.users.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let index_key = keys::user_email_index_key(email);
        let Some(user_id_raw) = self.users.get(index_key.as_bytes())? else {
            return Ok(None);
        };
        let user_id = match String::from_utf8(user_id_raw.to_vec()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid UTF-8 in user email index");
                return Ok(None);
            }
        };
        self.get_user_by_id(&user_id)
    }

    pub fn update_user(&self, user: &User) -> Result<(), StoreError> {
        if self.get_user_by_id(&user.id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "user".to_string(),
                key: user.id.clone(),
            });
        }
        // Email is immutable after provisioning, so the index never moves
        let user_bytes = Self::serialize(user)?;
        self.users
            .insert(keys::user_key(&user.id).as_bytes(), user_bytes)?;
        Ok(())
    }

    /// Remove the user record, its email index, all of its sessions and
    /// its stats counters. Progress records are kept for tenant-level
    /// reporting and cleaned up separately.
    pub fn delete_user(&self, user_id: &str) -> Result<(), StoreError> {
        let user = self
            .get_user_by_id(user_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "user".to_string(),
                key: user_id.to_string(),
            })?;

        self.users
            .remove(keys::user_email_index_key(&user.email).as_bytes())?;
        self.users.remove(keys::user_key(user_id).as_bytes())?;
        self.user_stats
            .remove(keys::user_stats_key(user_id).as_bytes())?;
        self.delete_user_sessions(user_id)?;
        Ok(())
    }

    pub fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<(), StoreError> {
        let mut user = self
            .get_user_by_id(user_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "user".to_string(),
                key: user_id.to_string(),
            })?;
        user.is_active = is_active;
        user.updated_at = Utc::now();
        self.update_user(&user)
    }

    /// Users of one tenant, newest first. `tenant_id` of `None` lists the
    /// whole platform (super-admin view).
    pub fn list_users(
        &self,
        tenant_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<User>, StoreError> {
        let mut users = Vec::new();
        for item in self.users.iter() {
            let (key, value) = item?;
            if key.starts_with(b"email:") {
                continue;
            }
            let user: User = Self::deserialize(&value)?;
            if tenant_id.map_or(true, |t| user.tenant_id == t) {
                users.push(user);
            }
        }

        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users.into_iter().skip(offset).take(limit).collect())
    }

    pub fn count_users(&self, tenant_id: Option<&str>) -> Result<u64, StoreError> {
        let mut count = 0u64;
        for item in self.users.iter() {
            let (key, value) = item?;
            if key.starts_with(b"email:") {
                continue;
            }
            if let Some(t) = tenant_id {
                let user: User = Self::deserialize(&value)?;
                if user.tenant_id != t {
                    continue;
                }
            }
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) fn sample_user(id: &str, email: &str, tenant_id: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: "Demo User".to_string(),
        password_hash: "hash".to_string(),
        role: UserRole::Staff,
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
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
