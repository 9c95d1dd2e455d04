//! Tenancy configuration and well-known constants.

use serde::{Deserialize, Serialize};

/// Name of the route parameter and HTTP header carrying the tenant
/// identifier.
pub const TENANT_ID_NAME: &str = "tenant";

/// Well-known identifier of the root tenant. Always present after startup.
pub const ROOT_TENANT_ID: &str = "root";

/// Display name seeded for the root tenant.
pub const ROOT_TENANT_NAME: &str = "Root";

/// Administrator email seeded for the root tenant.
pub const ROOT_TENANT_EMAIL: &str = "admin@root.com";

/// Configuration for the tenancy core.
///
/// Carries the process-wide default connection string (used by tenants with
/// no explicit one) and the root tenant's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// Connection string of the default database.
    pub default_connection_string: String,

    /// Identifier of the well-known root tenant.
    #[serde(default = "default_root_id")]
    pub root_id: String,

    /// Display name seeded for the root tenant.
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Administrator email seeded for the root tenant.
    #[serde(default = "default_root_email")]
    pub root_admin_email: String,
}

fn default_root_id() -> String {
    ROOT_TENANT_ID.to_string()
}

fn default_root_name() -> String {
    ROOT_TENANT_NAME.to_string()
}

fn default_root_email() -> String {
    ROOT_TENANT_EMAIL.to_string()
}

impl TenancyConfig {
    /// Create a configuration with the given default connection string.
    ///
    /// # Examples
    ///
    /// ```
    /// use silo_tenancy::TenancyConfig;
    ///
    /// let config = TenancyConfig::new("db=default");
    /// assert_eq!(config.root_id, "root");
    /// ```
    pub fn new(default_connection_string: impl Into<String>) -> Self {
        Self {
            default_connection_string: default_connection_string.into(),
            root_id: default_root_id(),
            root_name: default_root_name(),
            root_admin_email: default_root_email(),
        }
    }

    /// Override the root tenant identity.
    pub fn with_root(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        admin_email: impl Into<String>,
    ) -> Self {
        self.root_id = id.into();
        self.root_name = name.into();
        self.root_admin_email = admin_email.into();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `SILO_DEFAULT_CONNECTION` (required) and the optional
    /// `SILO_ROOT_TENANT_ID`, `SILO_ROOT_TENANT_NAME`, and
    /// `SILO_ROOT_TENANT_EMAIL` overrides.
    pub fn from_env() -> Result<Self, crate::TenantError> {
        let default_connection_string = std::env::var("SILO_DEFAULT_CONNECTION").map_err(|_| {
            crate::TenantError::InvalidConfiguration(
                "SILO_DEFAULT_CONNECTION is not set".to_string(),
            )
        })?;

        let mut config = Self::new(default_connection_string);
        if let Ok(id) = std::env::var("SILO_ROOT_TENANT_ID") {
            config.root_id = id;
        }
        if let Ok(name) = std::env::var("SILO_ROOT_TENANT_NAME") {
            config.root_name = name;
        }
        if let Ok(email) = std::env::var("SILO_ROOT_TENANT_EMAIL") {
            config.root_admin_email = email;
        }
        Ok(config)
    }
}
