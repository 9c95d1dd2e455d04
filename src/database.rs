//! Database Per Tenant
//!
//! Maps a tenant record to a live database handle, substituting the
//! configured default connection string when the tenant has none.
//!
//! Every [`TenantDatabaseManager::provision`] call yields an isolated handle
//! scoped to its caller. Nothing here mutates shared tenant state, so
//! concurrent callers for different tenants can never leak data across
//! tenants.

use crate::error::TenantError;
use crate::tenant::TenantRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Database connection provider trait.
///
/// Implement this with your database of choice; the manager only needs to
/// open handles and check reachability.
#[async_trait]
pub trait DatabaseProvider: Send + Sync {
    /// The connection type handed to data-access code.
    type Connection: Send + Sync;

    /// Open a connection to the database at the given connection string.
    async fn connect(&self, connection_string: &str) -> Result<Self::Connection, TenantError>;

    /// Check that a connection's target is reachable.
    async fn ping(&self, connection: &Self::Connection) -> Result<(), TenantError>;
}

/// Tenant database manager.
///
/// Resolves each tenant's effective connection string and caches handles
/// keyed by tenant id plus connection string, so a reconfigured tenant never
/// receives a stale handle.
pub struct TenantDatabaseManager<P: DatabaseProvider> {
    provider: Arc<P>,
    default_connection_string: String,
    connection_cache: RwLock<HashMap<String, Arc<P::Connection>>>,
}

impl<P: DatabaseProvider> TenantDatabaseManager<P> {
    /// Create a manager over the given provider.
    pub fn new(provider: Arc<P>, default_connection_string: impl Into<String>) -> Self {
        Self {
            provider,
            default_connection_string: default_connection_string.into(),
            connection_cache: RwLock::new(HashMap::new()),
        }
    }

    /// The connection string a tenant's data actually lives at: the
    /// tenant's own string when set, the process-wide default otherwise.
    pub fn effective_connection_string<'a>(
        &'a self,
        tenant: &'a TenantRecord,
    ) -> Result<&'a str, TenantError> {
        match tenant.connection_string.as_deref() {
            Some(cs) if !cs.is_empty() => Ok(cs),
            _ if !self.default_connection_string.is_empty() => {
                Ok(self.default_connection_string.as_str())
            }
            _ => Err(TenantError::InvalidConfiguration(format!(
                "Tenant '{}' has no connection string and no default is configured",
                tenant.id
            ))),
        }
    }

    /// Get a database handle for the tenant.
    ///
    /// Returns the cached handle for this (tenant, connection string) pair
    /// when present, otherwise opens a new connection.
    pub async fn provision(&self, tenant: &TenantRecord) -> Result<Arc<P::Connection>, TenantError> {
        let connection_string = self.effective_connection_string(tenant)?.to_string();
        let cache_key = format!("{}:{}", tenant.id, connection_string);

        {
            let cache = self.connection_cache.read().await;
            if let Some(conn) = cache.get(&cache_key) {
                return Ok(Arc::clone(conn));
            }
        }

        debug!(tenant = %tenant.id, "Opening database connection");
        let connection = self.provider.connect(&connection_string).await?;
        let connection = Arc::new(connection);

        let mut cache = self.connection_cache.write().await;
        let entry = cache
            .entry(cache_key)
            .or_insert_with(|| Arc::clone(&connection));
        Ok(Arc::clone(entry))
    }

    /// Check that the tenant's database is reachable.
    pub async fn verify_connectivity(&self, tenant: &TenantRecord) -> Result<(), TenantError> {
        let connection = self.provision(tenant).await?;
        self.provider.ping(&connection).await
    }

    /// Drop the cached handle for a tenant.
    pub async fn invalidate(&self, tenant: &TenantRecord) {
        if let Ok(connection_string) = self.effective_connection_string(tenant) {
            let cache_key = format!("{}:{}", tenant.id, connection_string);
            self.connection_cache.write().await.remove(&cache_key);
        }
    }

    /// Drop all cached handles.
    pub async fn clear_cache(&self) {
        self.connection_cache.write().await.clear();
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }
}
