use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// An isolated organizational unit (one restaurant) sharing the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn create_tenant(&self, tenant: &Tenant) -> Result<(), StoreError> {
        let key = keys::tenant_key(&tenant.id);
        if self.tenants.get(key.as_bytes())?.is_some() {
            return Err(StoreError::Conflict {
                entity: "tenant".to_string(),
                key: tenant.id.clone(),
            });
        }
        self.tenants
            .insert(key.as_bytes(), Self::serialize(tenant)?)?;
        Ok(())
    }

    pub fn get_tenant(&self, tenant_id: &str) -> Result<Option<Tenant>, StoreError> {
        match self.tenants.get(keys::tenant_key(tenant_id).as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn update_tenant(&self, tenant: &Tenant) -> Result<(), StoreError> {
        let key = keys::tenant_key(&tenant.id);
        if self.tenants.get(key.as_bytes())?.is_none() {
            return Err(StoreError::NotFound {
                entity: "tenant".to_string(),
                key: tenant.id.clone(),
            });
        }
        self.tenants
            .insert(key.as_bytes(), Self::serialize(tenant)?)?;
        Ok(())
    }

    pub fn list_tenants(&self) -> Result<Vec<Tenant>, StoreError> {
        let mut tenants = Vec::new();
        for item in self.tenants.iter() {
            let (_, value) = item?;
            tenants.push(Self::deserialize::<Tenant>(&value)?);
        }
        tenants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tenants)
    }
}
