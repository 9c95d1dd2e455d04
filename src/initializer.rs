//! Startup Database Initialization
//!
//! Runs once at process startup, before the server accepts traffic:
//! migrates the root catalog, seeds the root tenant, then walks every
//! tenant in the catalog and brings its database schema up to date.
//!
//! Root failures are fatal — the process must not start serving with a
//! broken catalog. Per-tenant failures are isolated: the tenant is logged
//! and skipped, and the loop moves on. A skipped tenant stays unmigrated
//! until the next run.

use crate::config::TenancyConfig;
use crate::database::{DatabaseProvider, TenantDatabaseManager};
use crate::error::TenantError;
use crate::migrate::SchemaMigrator;
use crate::store::TenantStore;
use crate::tenant::{TenantContext, TenantRecord};
use chrono::{Duration, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

/// Cooperative cancellation flag for the initialization sequence.
///
/// Cloning shares the flag. An in-flight migration step is abandoned at the
/// next checkpoint; no partial-migration rollback is attempted, since
/// migrations are individually atomic.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    /// Create a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Outcome of initializing one tenant's database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantInitOutcome {
    /// Pending migrations were applied.
    Migrated {
        /// Number of migrations applied.
        applied: usize,
    },
    /// The schema was already current.
    UpToDate,
    /// The tenant was left unmigrated; initialization continued with the
    /// next tenant.
    Skipped {
        /// Why the tenant was skipped.
        reason: String,
    },
}

impl TenantInitOutcome {
    /// Whether the tenant's database is ready to serve.
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Skipped { .. })
    }
}

/// Report of one initialization run.
#[derive(Debug, Default)]
pub struct InitializationReport {
    /// Per-tenant outcomes, in the order tenants were processed.
    pub outcomes: Vec<(String, TenantInitOutcome)>,
}

impl InitializationReport {
    /// Ids of tenants whose database is ready.
    pub fn ready(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.is_ready())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Ids of tenants that were skipped.
    pub fn skipped(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| !o.is_ready())
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Startup initializer for the root catalog and all tenant databases.
///
/// Not re-entrant: run it exactly once, to completion, before the server
/// begins accepting connections.
pub struct DatabaseInitializer<P, RM, TM>
where
    P: DatabaseProvider,
    RM: SchemaMigrator<Connection = P::Connection>,
    TM: SchemaMigrator<Connection = P::Connection>,
{
    store: Arc<dyn TenantStore>,
    manager: Arc<TenantDatabaseManager<P>>,
    root_migrator: Arc<RM>,
    tenant_migrator: Arc<TM>,
    config: TenancyConfig,
}

impl<P, RM, TM> DatabaseInitializer<P, RM, TM>
where
    P: DatabaseProvider,
    RM: SchemaMigrator<Connection = P::Connection>,
    TM: SchemaMigrator<Connection = P::Connection>,
{
    /// Create an initializer.
    ///
    /// `root_migrator` owns the catalog schema; `tenant_migrator` owns the
    /// application schema applied to every tenant database.
    pub fn new(
        store: Arc<dyn TenantStore>,
        manager: Arc<TenantDatabaseManager<P>>,
        root_migrator: Arc<RM>,
        tenant_migrator: Arc<TM>,
        config: TenancyConfig,
    ) -> Self {
        Self {
            store,
            manager,
            root_migrator,
            tenant_migrator,
            config,
        }
    }

    /// Run the full initialization sequence.
    ///
    /// Phases are strictly sequential: root migrate, root seed, then one
    /// pass over a snapshot of the catalog taken at the start of the
    /// per-tenant phase. Tenants added after the snapshot are picked up on
    /// the next run.
    pub async fn run(
        &self,
        cancellation: &Cancellation,
    ) -> Result<InitializationReport, TenantError> {
        self.initialize_root().await?;

        let mut report = InitializationReport::default();
        if cancellation.is_cancelled() {
            info!("Initialization cancelled before the tenant phase");
            return Ok(report);
        }

        let snapshot = self.store.all().await?;
        for tenant in snapshot {
            if cancellation.is_cancelled() {
                info!("Initialization cancelled; remaining tenants left for the next run");
                break;
            }

            let outcome = self.initialize_tenant(&tenant).await;
            report.outcomes.push((tenant.id, outcome));
        }

        Ok(report)
    }

    /// Migrate the root catalog and seed the root tenant. Fatal on failure.
    async fn initialize_root(&self) -> Result<(), TenantError> {
        let connection = self
            .manager
            .provider()
            .connect(&self.config.default_connection_string)
            .await?;

        let pending = self.root_migrator.pending(&connection).await?;
        if !pending.is_empty() {
            info!(count = pending.len(), "Applying root catalog migrations");
            self.root_migrator.apply(&connection).await?;
        }

        self.seed_root_tenant().await
    }

    /// Insert the root tenant if it is missing. Idempotent via the
    /// existence lookup.
    async fn seed_root_tenant(&self) -> Result<(), TenantError> {
        if self.store.find_by_id(&self.config.root_id).await?.is_some() {
            return Ok(());
        }

        info!(tenant = %self.config.root_id, "Seeding root tenant");
        let mut root = TenantRecord::new(&self.config.root_id, &self.config.root_name)
            .with_admin_email(&self.config.root_admin_email);
        root.set_validity(Utc::now() + Duration::days(365));

        self.store.insert(root).await
    }

    /// Bring one tenant's database up to date.
    ///
    /// Failures are captured in the outcome rather than returned, so a bulk
    /// run can continue with the remaining tenants. Also usable on its own
    /// for an administrative re-run of a single tenant.
    pub async fn initialize_tenant(&self, tenant: &TenantRecord) -> TenantInitOutcome {
        // Each iteration owns its context; nothing tenant-scoped is shared
        // across iterations.
        let context = TenantContext::new(tenant.clone());
        let tenant = context.tenant();

        info!(tenant = %tenant.id, name = %tenant.name, "Initializing tenant database");

        let connection = match self.manager.provision(tenant).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(tenant = %tenant.id, error = %e, "Cannot provision tenant database; skipping");
                return TenantInitOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        if let Err(e) = self.manager.verify_connectivity(tenant).await {
            warn!(tenant = %tenant.id, error = %e, "Cannot connect to tenant database; skipping");
            return TenantInitOutcome::Skipped {
                reason: e.to_string(),
            };
        }

        let pending = match self.tenant_migrator.pending(&connection).await {
            Ok(pending) => pending,
            Err(e) => {
                error!(tenant = %tenant.id, error = %e, "Failed to read pending migrations; skipping");
                return TenantInitOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        if pending.is_empty() {
            info!(tenant = %tenant.id, "No pending migrations");
            return TenantInitOutcome::UpToDate;
        }

        info!(tenant = %tenant.id, count = pending.len(), "Applying migrations");
        match self.tenant_migrator.apply(&connection).await {
            Ok(()) => {
                info!(tenant = %tenant.id, "Migrations applied");
                TenantInitOutcome::Migrated {
                    applied: pending.len(),
                }
            }
            Err(e) => {
                error!(tenant = %tenant.id, error = %e, "Migration failed; tenant left unmigrated");
                TenantInitOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }
}
