use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub tenant_id: String,
    pub title: String,
    pub body: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Announcement {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |e| e < now)
    }
}

impl Store {
    pub fn create_announcement(&self, announcement: &Announcement) -> Result<(), StoreError> {
        let key = keys::announcement_key(
            &announcement.tenant_id,
            announcement.created_at.timestamp_millis(),
            &announcement.id,
        );
        self.announcements
            .insert(key.as_bytes(), Self::serialize(announcement)?)?;
        Ok(())
    }

    /// Tenant announcements, newest first. `include_expired` is the admin
    /// view; staff listings filter expired entries out.
    pub fn list_announcements(
        &self,
        tenant_id: &str,
        include_expired: bool,
        limit: usize,
    ) -> Result<Vec<Announcement>, StoreError> {
        let now = Utc::now();
        let prefix = keys::announcement_prefix(tenant_id);
        let mut items = Vec::new();
        for entry in self.announcements.scan_prefix(prefix.as_bytes()) {
            let (_, value) = entry?;
            let announcement: Announcement = Self::deserialize(&value)?;
            if include_expired || !announcement.is_expired(now) {
                items.push(announcement);
            }
            if items.len() >= limit {
                break;
            }
        }
        Ok(items)
    }

    pub fn delete_announcement(
        &self,
        tenant_id: &str,
        announcement_id: &str,
    ) -> Result<(), StoreError> {
        let prefix = keys::announcement_prefix(tenant_id);
        for entry in self.announcements.scan_prefix(prefix.as_bytes()) {
            let (key, value) = entry?;
            let announcement: Announcement = Self::deserialize(&value)?;
            if announcement.id == announcement_id {
                self.announcements.remove(key)?;
                return Ok(());
            }
        }
        Err(StoreError::NotFound {
            entity: "announcement".to_string(),
            key: announcement_id.to_string(),
        })
    }

    /// Remove announcements past their expiry, across all tenants.
    /// Returns how many were removed.
    pub fn cleanup_expired_announcements(&self) -> Result<usize, StoreError> {
        let now = Utc::now();
        let mut stale_keys = Vec::new();
        for entry in self.announcements.iter() {
            let (key, value) = entry?;
            let announcement: Announcement = Self::deserialize(&value)?;
            if announcement.is_expired(now) {
                stale_keys.push(key.to_vec());
            }
        }
        for key in &stale_keys {
            self.announcements.remove(key.as_slice())?;
        }
        Ok(stale_keys.len())
    }
}
