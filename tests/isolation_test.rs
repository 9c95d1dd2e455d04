//! Cross-tenant isolation: provisioning maps each tenant to its own target,
//! and concurrent requests for different tenants never observe each other's
//! data.

use silo_tenancy::prelude::*;
use std::sync::Arc;

fn seeded_store() -> Arc<InMemoryTenantStore> {
    Arc::new(InMemoryTenantStore::with_tenants([
        TenantRecord::new("root", "Root"),
        TenantRecord::new("acme", "Acme Corp").with_connection_string("db=acme"),
        TenantRecord::new("globex", "Globex").with_connection_string("db=globex"),
    ]))
}

fn manager(
    provider: &Arc<InMemoryDatabaseProvider>,
) -> Arc<TenantDatabaseManager<InMemoryDatabaseProvider>> {
    Arc::new(TenantDatabaseManager::new(Arc::clone(provider), "db=default"))
}

#[tokio::test]
async fn provision_maps_each_tenant_to_its_exact_target() {
    let provider = Arc::new(InMemoryDatabaseProvider::new());
    let manager = manager(&provider);
    let store = seeded_store();

    // Empty connection string resolves to the default database.
    let root = store.find_by_id("root").await.unwrap().unwrap();
    let handle = manager.provision(&root).await.unwrap();
    assert_eq!(handle.connection_string(), "db=default");

    let acme = store.find_by_id("acme").await.unwrap().unwrap();
    let handle = manager.provision(&acme).await.unwrap();
    assert_eq!(handle.connection_string(), "db=acme");
}

#[tokio::test]
async fn unknown_tenant_resolves_to_not_found_not_another_tenant() {
    let resolver = CatalogTenantResolver::new(seeded_store(), "root");
    let request = TenantRequest::new().with_route_value("unknown");

    let err = resolver.resolve(&request).await.unwrap_err();
    assert!(matches!(err, TenantError::NotFound(id) if id == "unknown"));
}

#[tokio::test]
async fn concurrent_requests_observe_only_their_own_tenant_data() {
    let provider = Arc::new(InMemoryDatabaseProvider::new());
    let manager = manager(&provider);
    let store = seeded_store();
    let resolver = Arc::new(CatalogTenantResolver::new(
        Arc::clone(&store) as Arc<dyn TenantStore>,
        "root",
    ));

    // Seed each tenant's database with its own products.
    for (tenant_id, names) in [("acme", ["Widget", "Sprocket"]), ("globex", ["Gadget", "Gizmo"])] {
        let tenant = store.find_by_id(tenant_id).await.unwrap().unwrap();
        let db = manager.provision(&tenant).await.unwrap();
        for name in names {
            db.insert_product(Product::new(name, tenant_id));
        }
    }

    // One request-shaped unit of work: resolve, build a scoped context,
    // provision, read.
    async fn handle_request(
        resolver: Arc<CatalogTenantResolver>,
        manager: Arc<TenantDatabaseManager<InMemoryDatabaseProvider>>,
        request: TenantRequest,
    ) -> Vec<String> {
        let tenant = resolver.resolve(&request).await.unwrap();
        let context = TenantContext::new(tenant);
        let db = manager.provision(context.tenant()).await.unwrap();
        db.products_for(context.tenant_id())
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    let (acme_products, globex_products) = tokio::join!(
        handle_request(
            Arc::clone(&resolver),
            Arc::clone(&manager),
            TenantRequest::new().with_route_value("acme"),
        ),
        handle_request(
            Arc::clone(&resolver),
            Arc::clone(&manager),
            TenantRequest::new().with_header_value("globex"),
        ),
    );

    assert_eq!(acme_products, vec!["Widget", "Sprocket"]);
    assert_eq!(globex_products, vec!["Gadget", "Gizmo"]);
    assert!(acme_products.iter().all(|p| !globex_products.contains(p)));
}

#[tokio::test]
async fn tenants_sharing_the_default_database_are_row_isolated() {
    let provider = Arc::new(InMemoryDatabaseProvider::new());
    let manager = manager(&provider);
    let store = Arc::new(InMemoryTenantStore::with_tenants([
        TenantRecord::new("root", "Root"),
        TenantRecord::new("acme", "Acme Corp"),
    ]));

    let root = store.find_by_id("root").await.unwrap().unwrap();
    let acme = store.find_by_id("acme").await.unwrap().unwrap();

    let root_db = manager.provision(&root).await.unwrap();
    let acme_db = manager.provision(&acme).await.unwrap();

    root_db.insert_product(Product::new("Ledger", "root"));
    acme_db.insert_product(Product::new("Widget", "acme"));

    // Both handles target the shared default database, but reads keyed by
    // the owning tenant stay disjoint.
    assert_eq!(root_db.connection_string(), acme_db.connection_string());
    assert_eq!(root_db.products_for("root").len(), 1);
    assert_eq!(root_db.products_for("acme").len(), 1);
    assert_ne!(
        root_db.products_for("root")[0].name,
        root_db.products_for("acme")[0].name
    );
}
