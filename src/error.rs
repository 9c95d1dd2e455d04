//! Error types for tenancy operations.

use thiserror::Error;

/// Errors produced by tenant resolution, provisioning, and initialization.
#[derive(Debug, Error)]
pub enum TenantError {
    /// No tenant exists for the given identifier.
    #[error("Tenant not found: {0}")]
    NotFound(String),

    /// The target database could not be reached.
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// A schema migration failed to apply.
    #[error("Migration failure for '{tenant}': {detail}")]
    MigrationFailure {
        /// Identifier of the database being migrated ("root" for the catalog).
        tenant: String,
        /// Underlying failure description.
        detail: String,
    },

    /// The tenant has no usable connection target and no default is configured.
    #[error("Invalid tenant configuration: {0}")]
    InvalidConfiguration(String),

    /// The tenant catalog store itself failed.
    #[error("Storage error: {0}")]
    Storage(String),
}
