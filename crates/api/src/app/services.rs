//! Infrastructure wiring: repositories, cache, event bus, registries.

use std::sync::Arc;

use refdata_cache::{Cache, MemoryCache};
use refdata_catalog::{Product, Service, Tier};
use refdata_events::{EventBus, InMemoryEventBus, LifecycleEvent};
use refdata_finance::{Bank, Country, Currency, Tax};
use refdata_geography::{City, Corridor, Region, Sector};
use refdata_network::{Agency, AgencyTier, Partner};
use refdata_registry::{CatalogRegistry, FinanceRegistry, GeographyRegistry, NetworkRegistry};
use refdata_store::MemoryRepository;

/// The handler registries, sharing one cache, one bus and one repository per
/// record type (repositories cross registry boundaries: disabling a city
/// consults agencies, disabling a tier consults agency-tiers).
pub struct AppServices {
    pub geography: GeographyRegistry,
    pub finance: FinanceRegistry,
    pub catalog: CatalogRegistry,
    pub network: NetworkRegistry,
}

pub fn build_services() -> AppServices {
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    let bus = Arc::new(InMemoryEventBus::<LifecycleEvent>::new());
    spawn_audit_logger(bus.as_ref());
    let bus: Arc<dyn EventBus<LifecycleEvent>> = bus;

    let regions = Arc::new(MemoryRepository::<Region>::new());
    let cities = Arc::new(MemoryRepository::<City>::new());
    let sectors = Arc::new(MemoryRepository::<Sector>::new());
    let corridors = Arc::new(MemoryRepository::<Corridor>::new());
    let banks = Arc::new(MemoryRepository::<Bank>::new());
    let currencies = Arc::new(MemoryRepository::<Currency>::new());
    let countries = Arc::new(MemoryRepository::<Country>::new());
    let taxes = Arc::new(MemoryRepository::<Tax>::new());
    let products = Arc::new(MemoryRepository::<Product>::new());
    let services = Arc::new(MemoryRepository::<Service>::new());
    let tiers = Arc::new(MemoryRepository::<Tier>::new());
    let agencies = Arc::new(MemoryRepository::<Agency>::new());
    let agency_tiers = Arc::new(MemoryRepository::<AgencyTier>::new());
    let partners = Arc::new(MemoryRepository::<Partner>::new());

    AppServices {
        geography: GeographyRegistry::new(
            regions,
            cities.clone(),
            sectors,
            corridors,
            agencies.clone(),
            cache.clone(),
            bus.clone(),
        ),
        finance: FinanceRegistry::new(
            banks,
            currencies,
            countries,
            taxes,
            cache.clone(),
            bus.clone(),
        ),
        catalog: CatalogRegistry::new(
            products,
            services,
            tiers.clone(),
            agency_tiers.clone(),
            cache.clone(),
            bus.clone(),
        ),
        network: NetworkRegistry::new(
            agencies,
            agency_tiers,
            partners,
            cities,
            tiers,
            cache,
            bus,
        ),
    }
}

/// Drain the audit stream into the structured log.
fn spawn_audit_logger(bus: &InMemoryEventBus<LifecycleEvent>) {
    let subscription = bus.subscribe();
    std::thread::spawn(move || {
        while let Ok(event) = subscription.recv() {
            tracing::info!(
                event_type = %event.event_type(),
                aggregate_id = %event.aggregate_id(),
                occurred_at = %event.occurred_at(),
                "audit"
            );
        }
    });
}
