//! Tenant catalog store.
//!
//! The persistence seam for [`TenantRecord`]s. A relational catalog (a
//! `Tenants` table in the root database) implements this trait; the crate
//! ships an in-memory implementation for tests and demos.

use crate::error::TenantError;
use crate::tenant::TenantRecord;
use async_trait::async_trait;

/// Persistent store of tenant records.
///
/// Implement this trait against your catalog database. Infrastructure
/// failures surface as [`TenantError::Storage`].
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Find a tenant by its identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<TenantRecord>, TenantError>;

    /// All tenants currently in the catalog, in enumeration order.
    async fn all(&self) -> Result<Vec<TenantRecord>, TenantError>;

    /// Insert a new tenant. Fails with [`TenantError::Storage`] if the id is
    /// already taken.
    async fn insert(&self, tenant: TenantRecord) -> Result<(), TenantError>;

    /// Replace an existing tenant record.
    async fn update(&self, tenant: TenantRecord) -> Result<(), TenantError>;
}

/// In-memory tenant store.
///
/// Enumeration order is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTenantStore {
    tenants: parking_lot::RwLock<Vec<TenantRecord>>,
}

impl InMemoryTenantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given tenants.
    pub fn with_tenants(tenants: impl IntoIterator<Item = TenantRecord>) -> Self {
        Self {
            tenants: parking_lot::RwLock::new(tenants.into_iter().collect()),
        }
    }
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<TenantRecord>, TenantError> {
        Ok(self.tenants.read().iter().find(|t| t.id == id).cloned())
    }

    async fn all(&self) -> Result<Vec<TenantRecord>, TenantError> {
        Ok(self.tenants.read().clone())
    }

    async fn insert(&self, tenant: TenantRecord) -> Result<(), TenantError> {
        let mut tenants = self.tenants.write();
        if tenants.iter().any(|t| t.id == tenant.id) {
            return Err(TenantError::Storage(format!(
                "Tenant {} already exists",
                tenant.id
            )));
        }
        tenants.push(tenant);
        Ok(())
    }

    async fn update(&self, tenant: TenantRecord) -> Result<(), TenantError> {
        let mut tenants = self.tenants.write();
        match tenants.iter_mut().find(|t| t.id == tenant.id) {
            Some(slot) => {
                *slot = tenant;
                Ok(())
            }
            None => Err(TenantError::NotFound(tenant.id)),
        }
    }
}

/// Tenant store that fails every operation, for exercising
/// infrastructure-failure paths.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingTenantStore;

#[cfg(test)]
#[async_trait]
impl TenantStore for FailingTenantStore {
    async fn find_by_id(&self, _id: &str) -> Result<Option<TenantRecord>, TenantError> {
        Err(TenantError::Storage("catalog unavailable".to_string()))
    }

    async fn all(&self) -> Result<Vec<TenantRecord>, TenantError> {
        Err(TenantError::Storage("catalog unavailable".to_string()))
    }

    async fn insert(&self, _tenant: TenantRecord) -> Result<(), TenantError> {
        Err(TenantError::Storage("catalog unavailable".to_string()))
    }

    async fn update(&self, _tenant: TenantRecord) -> Result<(), TenantError> {
        Err(TenantError::Storage("catalog unavailable".to_string()))
    }
}
