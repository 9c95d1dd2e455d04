//! Tenant Resolution
//!
//! Maps an inbound request's tenant identifier to a catalog record.
//!
//! The web framework extracts the identifier from the route (the
//! `/{tenant}/api/...` segment) and from the header named by
//! [`TENANT_ID_NAME`](crate::config::TENANT_ID_NAME), then hands both to the
//! resolver as a [`TenantRequest`]. Raw request objects never reach this
//! layer.

use crate::error::TenantError;
use crate::store::TenantStore;
use crate::tenant::TenantRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// Tenant identifiers extracted from one inbound request.
#[derive(Debug, Clone, Default)]
pub struct TenantRequest {
    /// Identifier embedded in the route, if any.
    pub route_value: Option<String>,
    /// Identifier carried by the tenant header, if any.
    pub header_value: Option<String>,
}

impl TenantRequest {
    /// A request carrying no tenant identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the route-embedded identifier.
    pub fn with_route_value(mut self, value: impl Into<String>) -> Self {
        self.route_value = Some(value.into());
        self
    }

    /// Set the header-carried identifier.
    pub fn with_header_value(mut self, value: impl Into<String>) -> Self {
        self.header_value = Some(value.into());
        self
    }

    /// The identifier this request selects: route value when present,
    /// header value otherwise.
    pub fn identifier(&self) -> Option<&str> {
        self.route_value
            .as_deref()
            .or(self.header_value.as_deref())
    }
}

/// Tenant resolver trait.
#[async_trait]
pub trait TenantResolver: Send + Sync {
    /// Resolve the tenant a request belongs to.
    async fn resolve(&self, request: &TenantRequest) -> Result<TenantRecord, TenantError>;
}

/// Catalog-backed resolver with route-over-header precedence.
///
/// A request with no identifier at all resolves to the configured fallback
/// tenant (normally the root tenant) instead of failing. An identifier that
/// matches no catalog record is a [`TenantError::NotFound`]; resolution
/// never silently substitutes a different tenant.
pub struct CatalogTenantResolver {
    store: Arc<dyn TenantStore>,
    fallback_id: String,
}

impl CatalogTenantResolver {
    /// Create a resolver over the given catalog store.
    ///
    /// `fallback_id` is the tenant used when a request carries no
    /// identifier.
    pub fn new(store: Arc<dyn TenantStore>, fallback_id: impl Into<String>) -> Self {
        Self {
            store,
            fallback_id: fallback_id.into(),
        }
    }
}

#[async_trait]
impl TenantResolver for CatalogTenantResolver {
    async fn resolve(&self, request: &TenantRequest) -> Result<TenantRecord, TenantError> {
        let id = request.identifier().unwrap_or(&self.fallback_id);

        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| TenantError::NotFound(id.to_string()))
    }
}
