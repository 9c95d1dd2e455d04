//! Multi-Tenant Data Isolation Core
//!
//! Tenant-per-database isolation for CRUD services: each request is scoped
//! to a tenant resolved from the URL path or a header, and that tenant's
//! identity selects a distinct backing database. A root catalog stores the
//! tenant records; a startup initializer migrates the catalog, seeds the
//! root tenant, and brings every tenant database's schema up to date before
//! traffic is served.
//!
//! # Features
//!
//! - **Tenant Catalog** - Persistent store of tenant records behind a trait
//! - **Tenant Resolution** - Route-over-header identifier precedence with a
//!   root-tenant fallback
//! - **Database Per Tenant** - Connection provisioning with a default
//!   fallback and per-tenant handle caching
//! - **Startup Initialization** - Root migrate, root seed, then sequential
//!   per-tenant migration with isolated failure handling
//! - **Tenant Administration** - List, existence checks, idempotent
//!   activate/deactivate, validity extension
//!
//! # Quick Start
//!
//! ```
//! use silo_tenancy::prelude::*;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store: Arc<dyn TenantStore> = Arc::new(InMemoryTenantStore::with_tenants([
//!     TenantRecord::new("acme", "Acme Corp").with_connection_string("db=acme"),
//! ]));
//!
//! let config = TenancyConfig::new("db=default");
//! let provider = Arc::new(InMemoryDatabaseProvider::new());
//! let manager = Arc::new(TenantDatabaseManager::new(
//!     Arc::clone(&provider),
//!     config.default_connection_string.clone(),
//! ));
//!
//! let initializer = DatabaseInitializer::new(
//!     Arc::clone(&store),
//!     Arc::clone(&manager),
//!     Arc::new(InMemoryMigrator::new(["0001_tenants"])),
//!     Arc::new(InMemoryMigrator::new(["0001_products"])),
//!     config,
//! );
//! let report = initializer.run(&Cancellation::new()).await.unwrap();
//! assert_eq!(report.skipped().len(), 0);
//!
//! // Resolve a request and provision its tenant's database.
//! let resolver = CatalogTenantResolver::new(Arc::clone(&store), "root");
//! let tenant = resolver
//!     .resolve(&TenantRequest::new().with_route_value("acme"))
//!     .await
//!     .unwrap();
//! let handle = manager.provision(&tenant).await.unwrap();
//! assert_eq!(handle.connection_string(), "db=acme");
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod error;
pub mod initializer;
pub mod memory;
pub mod migrate;
pub mod product;
pub mod resolver;
pub mod service;
pub mod store;
pub mod tenant;

pub use config::{
    ROOT_TENANT_EMAIL, ROOT_TENANT_ID, ROOT_TENANT_NAME, TENANT_ID_NAME, TenancyConfig,
};
pub use database::{DatabaseProvider, TenantDatabaseManager};
pub use error::TenantError;
pub use initializer::{
    Cancellation, DatabaseInitializer, InitializationReport, TenantInitOutcome,
};
pub use memory::{InMemoryDatabase, InMemoryDatabaseProvider, InMemoryMigrator};
pub use migrate::SchemaMigrator;
pub use product::{MAX_NAME_LEN, Product};
pub use resolver::{CatalogTenantResolver, TenantRequest, TenantResolver};
pub use service::{TenantDto, TenantService};
pub use store::{InMemoryTenantStore, TenantStore};
pub use tenant::{TenantContext, TenantRecord};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{TENANT_ID_NAME, TenancyConfig};
    pub use crate::database::{DatabaseProvider, TenantDatabaseManager};
    pub use crate::error::TenantError;
    pub use crate::initializer::{
        Cancellation, DatabaseInitializer, InitializationReport, TenantInitOutcome,
    };
    pub use crate::memory::{InMemoryDatabaseProvider, InMemoryMigrator};
    pub use crate::migrate::SchemaMigrator;
    pub use crate::product::Product;
    pub use crate::resolver::{CatalogTenantResolver, TenantRequest, TenantResolver};
    pub use crate::service::{TenantDto, TenantService};
    pub use crate::store::{InMemoryTenantStore, TenantStore};
    pub use crate::tenant::{TenantContext, TenantRecord};
}
