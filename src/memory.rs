//! In-memory databases for tests and demos.
//!
//! One [`InMemoryDatabase`] stands in for one database server target:
//! connections to the same connection string share the same database, so two
//! tenants pointed at the same target really do share storage — and two
//! tenants with distinct targets really are isolated.

use crate::database::DatabaseProvider;
use crate::error::TenantError;
use crate::migrate::SchemaMigrator;
use crate::product::Product;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A simulated per-tenant database holding product rows.
#[derive(Debug)]
pub struct InMemoryDatabase {
    connection_string: String,
    applied_migrations: RwLock<Vec<String>>,
    products: RwLock<Vec<Product>>,
}

impl InMemoryDatabase {
    fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            applied_migrations: RwLock::new(Vec::new()),
            products: RwLock::new(Vec::new()),
        }
    }

    /// The connection string this database answers at.
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Migrations applied so far, in order.
    pub fn applied_migrations(&self) -> Vec<String> {
        self.applied_migrations.read().clone()
    }

    /// Insert a product row.
    pub fn insert_product(&self, product: Product) {
        self.products.write().push(product);
    }

    /// All product rows owned by the given tenant.
    pub fn products_for(&self, tenant_id: &str) -> Vec<Product> {
        self.products
            .read()
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    /// All product rows in this database.
    pub fn all_products(&self) -> Vec<Product> {
        self.products.read().clone()
    }
}

/// In-memory [`DatabaseProvider`].
///
/// Targets can be marked unreachable to exercise skip-and-log paths.
#[derive(Debug, Default)]
pub struct InMemoryDatabaseProvider {
    databases: RwLock<HashMap<String, Arc<InMemoryDatabase>>>,
    unreachable: RwLock<HashSet<String>>,
}

impl InMemoryDatabaseProvider {
    /// Create a provider with no databases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given target refuse connections and fail pings.
    pub fn mark_unreachable(&self, connection_string: impl Into<String>) {
        self.unreachable.write().insert(connection_string.into());
    }

    /// Make the given target reachable again.
    pub fn mark_reachable(&self, connection_string: &str) {
        self.unreachable.write().remove(connection_string);
    }

    /// The database at the given target, if a connection has created it.
    pub fn database(&self, connection_string: &str) -> Option<Arc<InMemoryDatabase>> {
        self.databases.read().get(connection_string).cloned()
    }
}

#[async_trait]
impl DatabaseProvider for InMemoryDatabaseProvider {
    type Connection = Arc<InMemoryDatabase>;

    async fn connect(&self, connection_string: &str) -> Result<Self::Connection, TenantError> {
        if self.unreachable.read().contains(connection_string) {
            return Err(TenantError::ConnectionFailure(format!(
                "{connection_string} is unreachable"
            )));
        }

        let mut databases = self.databases.write();
        let database = databases
            .entry(connection_string.to_string())
            .or_insert_with(|| Arc::new(InMemoryDatabase::new(connection_string)));
        Ok(Arc::clone(database))
    }

    async fn ping(&self, connection: &Self::Connection) -> Result<(), TenantError> {
        if self.unreachable.read().contains(connection.connection_string()) {
            return Err(TenantError::ConnectionFailure(format!(
                "{} is unreachable",
                connection.connection_string()
            )));
        }
        Ok(())
    }
}

/// In-memory [`SchemaMigrator`] with a fixed, ordered migration list.
///
/// Individual targets can be made to fail `apply`, to exercise per-tenant
/// failure isolation.
#[derive(Debug)]
pub struct InMemoryMigrator {
    migrations: Vec<String>,
    failing: RwLock<HashSet<String>>,
}

impl InMemoryMigrator {
    /// Create a migrator owning the given ordered migration set.
    pub fn new(migrations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            migrations: migrations.into_iter().map(Into::into).collect(),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Make `apply` fail for the database at the given target.
    pub fn fail_on(&self, connection_string: impl Into<String>) {
        self.failing.write().insert(connection_string.into());
    }
}

#[async_trait]
impl SchemaMigrator for InMemoryMigrator {
    type Connection = Arc<InMemoryDatabase>;

    async fn pending(&self, connection: &Self::Connection) -> Result<Vec<String>, TenantError> {
        let applied = connection.applied_migrations.read();
        Ok(self
            .migrations
            .iter()
            .filter(|m| !applied.contains(m))
            .cloned()
            .collect())
    }

    async fn apply(&self, connection: &Self::Connection) -> Result<(), TenantError> {
        if self.failing.read().contains(connection.connection_string()) {
            return Err(TenantError::MigrationFailure {
                tenant: connection.connection_string().to_string(),
                detail: "migration rejected by target".to_string(),
            });
        }

        let mut applied = connection.applied_migrations.write();
        for migration in &self.migrations {
            if !applied.contains(migration) {
                applied.push(migration.clone());
            }
        }
        Ok(())
    }
}
