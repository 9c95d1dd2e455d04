//! Tenant Administration
//!
//! Administrative operations on the tenant catalog: list, existence checks,
//! activation toggles, and validity extension. Each operation delegates to
//! the [`TenantStore`]; state-changing operations return a status message.

use crate::error::TenantError;
use crate::store::TenantStore;
use crate::tenant::TenantRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tenant record as exposed to administrative callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenantDto {
    /// Tenant identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Connection string, if the tenant has a dedicated database.
    pub connection_string: Option<String>,
    /// Administrator email.
    pub admin_email: Option<String>,
    /// Whether the tenant is active.
    pub active: bool,
    /// End of the validity window.
    pub valid_until: Option<DateTime<Utc>>,
}

impl From<&TenantRecord> for TenantDto {
    fn from(tenant: &TenantRecord) -> Self {
        Self {
            id: tenant.id.clone(),
            name: tenant.name.clone(),
            connection_string: tenant.connection_string.clone(),
            admin_email: tenant.admin_email.clone(),
            active: tenant.active,
            valid_until: tenant.valid_until,
        }
    }
}

/// Administrative service over the tenant catalog.
pub struct TenantService {
    store: Arc<dyn TenantStore>,
}

impl TenantService {
    /// Create a service over the given store.
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    /// All tenants in the catalog.
    pub async fn list_all(&self) -> Result<Vec<TenantDto>, TenantError> {
        Ok(self.store.all().await?.iter().map(TenantDto::from).collect())
    }

    /// Whether a tenant with this id exists.
    pub async fn exists_by_id(&self, id: &str) -> Result<bool, TenantError> {
        Ok(self.store.find_by_id(id).await?.is_some())
    }

    /// Whether a tenant with this display name exists.
    ///
    /// Names carry no uniqueness index; this is a linear scan over the
    /// catalog.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool, TenantError> {
        Ok(self.store.all().await?.iter().any(|t| t.name == name))
    }

    /// The tenant with this id, or [`TenantError::NotFound`].
    pub async fn get_by_id(&self, id: &str) -> Result<TenantDto, TenantError> {
        Ok(TenantDto::from(&self.get_record(id).await?))
    }

    /// Mark a tenant active. A no-op when already active.
    pub async fn activate(&self, id: &str) -> Result<String, TenantError> {
        let mut tenant = self.get_record(id).await?;
        tenant.activate();
        self.store.update(tenant).await?;
        Ok(format!("Tenant {id} is now Activated."))
    }

    /// Mark a tenant inactive. A no-op when already inactive.
    pub async fn deactivate(&self, id: &str) -> Result<String, TenantError> {
        let mut tenant = self.get_record(id).await?;
        tenant.deactivate();
        self.store.update(tenant).await?;
        Ok(format!("Tenant {id} is now Deactivated."))
    }

    /// Extend a tenant's validity window. No check that the new expiry is
    /// in the future; that is the caller's responsibility.
    pub async fn extend_validity(
        &self,
        id: &str,
        extended_expiry: DateTime<Utc>,
    ) -> Result<String, TenantError> {
        let mut tenant = self.get_record(id).await?;
        tenant.set_validity(extended_expiry);
        self.store.update(tenant).await?;
        Ok(format!(
            "Tenant {id}'s Subscription Upgraded. Now Valid till {extended_expiry}."
        ))
    }

    async fn get_record(&self, id: &str) -> Result<TenantRecord, TenantError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| TenantError::NotFound(id.to_string()))
    }
}
