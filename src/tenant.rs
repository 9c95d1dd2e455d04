//! Tenant Records
//!
//! The catalog entity describing a tenant, and the per-scope tenant context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant as stored in the root catalog.
///
/// The `id` is the stable lookup key and is never reused. A missing or empty
/// `connection_string` means the tenant's data lives in the process-wide
/// default database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenantRecord {
    /// Unique, immutable tenant identifier.
    pub id: String,

    /// Display name. Uniqueness is checked at the application level only.
    pub name: String,

    /// Connection string of the tenant's database. `None` selects the
    /// configured default database.
    pub connection_string: Option<String>,

    /// Contact address for the tenant's administrator.
    pub admin_email: Option<String>,

    /// Whether the tenant is administratively active.
    pub active: bool,

    /// End of the tenant's validity window. Stored for administrative use;
    /// resolution does not enforce expiry.
    pub valid_until: Option<DateTime<Utc>>,
}

impl TenantRecord {
    /// Create a new active tenant with no connection string.
    ///
    /// # Examples
    ///
    /// ```
    /// use silo_tenancy::TenantRecord;
    ///
    /// let tenant = TenantRecord::new("acme", "Acme Corp");
    /// assert!(tenant.active);
    /// assert!(tenant.connection_string.is_none());
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            connection_string: None,
            admin_email: None,
            active: true,
            valid_until: None,
        }
    }

    /// Set the connection string. An empty string is normalized to `None`,
    /// which means "use the default database".
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        let cs = connection_string.into();
        self.connection_string = if cs.is_empty() { None } else { Some(cs) };
        self
    }

    /// Set the administrator email.
    pub fn with_admin_email(mut self, email: impl Into<String>) -> Self {
        self.admin_email = Some(email.into());
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Mark the tenant active. Idempotent.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Mark the tenant inactive. Idempotent.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Set the validity window end. No check that the date is in the future;
    /// that is the caller's responsibility.
    pub fn set_validity(&mut self, valid_until: DateTime<Utc>) {
        self.valid_until = Some(valid_until);
    }
}

/// Tenant context for one unit of work.
///
/// Holds exactly one resolved tenant for the lifetime of a request scope or
/// one iteration of the startup tenant loop. The context is created at scope
/// start and read-only afterwards; concurrent scopes each own their own
/// instance, so tenants can never observe each other's context.
#[derive(Debug, Clone)]
pub struct TenantContext {
    tenant: TenantRecord,
}

impl TenantContext {
    /// Create a context bound to the given tenant.
    pub fn new(tenant: TenantRecord) -> Self {
        Self { tenant }
    }

    /// The tenant this scope is operating on.
    pub fn tenant(&self) -> &TenantRecord {
        &self.tenant
    }

    /// The tenant's identifier.
    pub fn tenant_id(&self) -> &str {
        &self.tenant.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_new() {
        let tenant = TenantRecord::new("acme", "Acme Corp");
        assert_eq!(tenant.id, "acme");
        assert_eq!(tenant.name, "Acme Corp");
        assert!(tenant.active);
        assert!(tenant.valid_until.is_none());
    }

    #[test]
    fn test_tenant_builder() {
        let tenant = TenantRecord::new("acme", "Acme Corp")
            .with_connection_string("db=acme")
            .with_admin_email("admin@acme.test");

        assert_eq!(tenant.connection_string.as_deref(), Some("db=acme"));
        assert_eq!(tenant.admin_email.as_deref(), Some("admin@acme.test"));
    }

    #[test]
    fn test_empty_connection_string_normalized() {
        let tenant = TenantRecord::new("root", "Root").with_connection_string("");
        assert!(tenant.connection_string.is_none());
    }

    #[test]
    fn test_activate_deactivate_idempotent() {
        let mut tenant = TenantRecord::new("acme", "Acme Corp");

        tenant.deactivate();
        tenant.deactivate();
        assert!(!tenant.active);

        tenant.activate();
        tenant.activate();
        assert!(tenant.active);
    }

    #[test]
    fn test_set_validity() {
        let mut tenant = TenantRecord::new("acme", "Acme Corp");
        let expiry = Utc::now();
        tenant.set_validity(expiry);
        assert_eq!(tenant.valid_until, Some(expiry));
    }

    #[test]
    fn test_record_json_round_trip() {
        let tenant = TenantRecord::new("acme", "Acme Corp")
            .with_connection_string("db=acme")
            .with_admin_email("admin@acme.test");

        let json = serde_json::to_string(&tenant).unwrap();
        let back: TenantRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tenant);
    }

    #[test]
    fn test_context_is_read_only_view() {
        let tenant = TenantRecord::new("acme", "Acme Corp");
        let context = TenantContext::new(tenant.clone());
        assert_eq!(context.tenant_id(), "acme");
        assert_eq!(context.tenant(), &tenant);
    }
}
