//! Schema migrations.
//!
//! The migration seam applied to the root catalog and to each tenant
//! database. Migrations are ordered, individually atomic steps; `apply`
//! brings a database to the current expected schema version.

use crate::error::TenantError;
use async_trait::async_trait;

/// Applies schema migrations to one database.
///
/// The same migration set is applied independently to every tenant
/// database, so schemas stay identical across tenants.
#[async_trait]
pub trait SchemaMigrator: Send + Sync {
    /// The connection type migrations run against.
    type Connection: Send + Sync;

    /// Identifiers of migrations not yet applied, in application order.
    async fn pending(&self, connection: &Self::Connection) -> Result<Vec<String>, TenantError>;

    /// Apply all pending migrations.
    async fn apply(&self, connection: &Self::Connection) -> Result<(), TenantError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingMigrator {
        total: usize,
        applied: AtomicUsize,
    }

    #[async_trait]
    impl SchemaMigrator for CountingMigrator {
        type Connection = ();

        async fn pending(&self, _connection: &()) -> Result<Vec<String>, TenantError> {
            let applied = self.applied.load(Ordering::Acquire);
            Ok((applied..self.total).map(|i| format!("m{i:04}")).collect())
        }

        async fn apply(&self, _connection: &()) -> Result<(), TenantError> {
            self.applied.store(self.total, Ordering::Release);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_apply_clears_pending() {
        let migrator = CountingMigrator {
            total: 2,
            applied: AtomicUsize::new(0),
        };

        assert_eq!(migrator.pending(&()).await.unwrap(), vec!["m0000", "m0001"]);
        migrator.apply(&()).await.unwrap();
        assert!(migrator.pending(&()).await.unwrap().is_empty());
    }
}
