//! Catalog handlers: Product, Service, Tier.

use std::sync::Arc;

use refdata_cache::Cache;
use refdata_catalog::{
    Product, ProductFilter, ProductId, ProductPatch, Service, ServiceFilter, ServiceId,
    ServicePatch, Tier, TierFilter, TierId, TierPatch,
};
use refdata_core::{DomainResult, EntityId, Money, Page, PageRequest, Referential, Violations};
use refdata_events::{EventBus, LifecycleEvent};
use refdata_network::{AgencyTier, AgencyTierFilter};
use refdata_store::{Repository, integrity};

use crate::support;

// -------------------------
// Commands & queries
// -------------------------

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PatchProduct {
    pub id: ProductId,
    pub patch: ProductPatch,
}

#[derive(Debug, Clone)]
pub struct CreateService {
    pub product_id: ProductId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateService {
    pub id: ServiceId,
    pub product_id: ProductId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PatchService {
    pub id: ServiceId,
    pub patch: ServicePatch,
}

#[derive(Debug, Clone)]
pub struct CreateTier {
    pub code: String,
    pub name: String,
    pub floor: Money,
    pub ceiling: Money,
}

#[derive(Debug, Clone)]
pub struct UpdateTier {
    pub id: TierId,
    pub code: String,
    pub name: String,
    pub floor: Money,
    pub ceiling: Money,
}

#[derive(Debug, Clone)]
pub struct PatchTier {
    pub id: TierId,
    pub patch: TierPatch,
}

#[derive(Debug, Clone, Default)]
pub struct ListProducts {
    pub filter: ProductFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListServices {
    pub filter: ServiceFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListTiers {
    pub filter: TierFilter,
    pub page: Option<PageRequest>,
}

fn code_name_rules(code: &str, name: &str) -> DomainResult<()> {
    let mut rules = Violations::new();
    rules.require_non_blank(code, "code");
    rules.require_non_blank(name, "name");
    rules.finish()
}

fn tier_bounds_rules(rules: &mut Violations, floor: &Money, ceiling: &Money) {
    rules.require(
        floor.currency() == ceiling.currency(),
        "floor and ceiling must share a currency",
    );
    rules.require(
        floor.amount_minor() <= ceiling.amount_minor(),
        "floor must not exceed ceiling",
    );
}

fn default_page() -> PageRequest {
    PageRequest::new(1, 20).expect("default page request is valid")
}

// -------------------------
// Handlers
// -------------------------

/// Holds the agency-tier port as well: a tier assigned to an agency must not
/// disappear from under it.
pub struct CatalogRegistry {
    products: Arc<dyn Repository<Product>>,
    services: Arc<dyn Repository<Service>>,
    tiers: Arc<dyn Repository<Tier>>,
    agency_tiers: Arc<dyn Repository<AgencyTier>>,
    cache: Arc<dyn Cache>,
    bus: Arc<dyn EventBus<LifecycleEvent>>,
}

impl CatalogRegistry {
    pub fn new(
        products: Arc<dyn Repository<Product>>,
        services: Arc<dyn Repository<Service>>,
        tiers: Arc<dyn Repository<Tier>>,
        agency_tiers: Arc<dyn Repository<AgencyTier>>,
        cache: Arc<dyn Cache>,
        bus: Arc<dyn EventBus<LifecycleEvent>>,
    ) -> Self {
        Self {
            products,
            services,
            tiers,
            agency_tiers,
            cache,
            bus,
        }
    }

    // --- Product ---

    pub async fn create_product(&self, cmd: CreateProduct) -> DomainResult<ProductId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = ProductId::new(EntityId::new());
        integrity::ensure_unique(
            self.products.as_ref(),
            ProductFilter {
                code: Some(cmd.code.clone()),
                ..ProductFilter::default()
            },
            &id,
            Product::KIND,
            &cmd.code,
        )
        .await?;

        let product = Product::create(id, cmd.code, cmd.name, cmd.description);
        self.products.add(product).await?;
        let events = self.products.save().await?;

        support::invalidate(self.cache.as_ref(), Product::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_product(&self, cmd: UpdateProduct) -> DomainResult<ProductId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut product = integrity::fetch(self.products.as_ref(), &cmd.id, Product::KIND).await?;
        integrity::ensure_unique(
            self.products.as_ref(),
            ProductFilter {
                code: Some(cmd.code.clone()),
                ..ProductFilter::default()
            },
            &cmd.id,
            Product::KIND,
            &cmd.code,
        )
        .await?;

        product.update(cmd.code, cmd.name, cmd.description);
        self.products.update(product.clone()).await?;
        let events = self.products.save().await?;

        support::refresh(self.cache.as_ref(), &product).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_product(&self, cmd: PatchProduct) -> DomainResult<ProductId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(name) = cmd.patch.name.as_deref() {
            rules.require_non_blank(name, "name");
        }
        rules.finish()?;

        let mut product = integrity::fetch(self.products.as_ref(), &cmd.id, Product::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.products.as_ref(),
                ProductFilter {
                    code: Some(code.clone()),
                    ..ProductFilter::default()
                },
                &cmd.id,
                Product::KIND,
                code,
            )
            .await?;
        }

        product.patch(cmd.patch);
        self.products.update(product).await?;
        let events = self.products.save().await?;

        support::invalidate(self.cache.as_ref(), Product::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_product(&self, id: ProductId) -> DomainResult<bool> {
        let mut product = integrity::fetch(self.products.as_ref(), &id, Product::KIND).await?;
        integrity::ensure_not_in_use(
            self.services.as_ref(),
            ServiceFilter {
                product_id: Some(id),
                ..ServiceFilter::default()
            },
            Product::KIND,
            Service::KIND,
        )
        .await?;

        product.disable();
        self.products.update(product).await?;
        let events = self.products.save().await?;

        support::invalidate(self.cache.as_ref(), Product::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_product(&self, id: ProductId) -> DomainResult<bool> {
        let mut product = integrity::fetch(self.products.as_ref(), &id, Product::KIND).await?;
        product.activate();
        self.products.update(product).await?;
        let events = self.products.save().await?;

        support::invalidate(self.cache.as_ref(), Product::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_product(&self, id: &ProductId) -> DomainResult<Product> {
        support::cached_get(self.cache.as_ref(), self.products.as_ref(), id, Product::KIND).await
    }

    pub async fn list_products(&self, query: ListProducts) -> DomainResult<Page<Product>> {
        let page = query.page.unwrap_or_else(default_page);
        self.products.page(&query.filter, &page).await
    }

    // --- Service ---

    pub async fn create_service(&self, cmd: CreateService) -> DomainResult<ServiceId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = ServiceId::new(EntityId::new());
        integrity::ensure_unique(
            self.services.as_ref(),
            ServiceFilter {
                code: Some(cmd.code.clone()),
                ..ServiceFilter::default()
            },
            &id,
            Service::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.products.as_ref(), &cmd.product_id, Product::KIND).await?;

        let service = Service::create(id, cmd.product_id, cmd.code, cmd.name);
        self.services.add(service).await?;
        let events = self.services.save().await?;

        support::invalidate(self.cache.as_ref(), Service::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_service(&self, cmd: UpdateService) -> DomainResult<ServiceId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut service = integrity::fetch(self.services.as_ref(), &cmd.id, Service::KIND).await?;
        integrity::ensure_unique(
            self.services.as_ref(),
            ServiceFilter {
                code: Some(cmd.code.clone()),
                ..ServiceFilter::default()
            },
            &cmd.id,
            Service::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.products.as_ref(), &cmd.product_id, Product::KIND).await?;

        service.update(cmd.product_id, cmd.code, cmd.name);
        self.services.update(service.clone()).await?;
        let events = self.services.save().await?;

        support::refresh(self.cache.as_ref(), &service).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_service(&self, cmd: PatchService) -> DomainResult<ServiceId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(name) = cmd.patch.name.as_deref() {
            rules.require_non_blank(name, "name");
        }
        rules.finish()?;

        let mut service = integrity::fetch(self.services.as_ref(), &cmd.id, Service::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.services.as_ref(),
                ServiceFilter {
                    code: Some(code.clone()),
                    ..ServiceFilter::default()
                },
                &cmd.id,
                Service::KIND,
                code,
            )
            .await?;
        }
        if let Some(product_id) = &cmd.patch.product_id {
            integrity::ensure_exists(self.products.as_ref(), product_id, Product::KIND).await?;
        }

        service.patch(cmd.patch);
        self.services.update(service).await?;
        let events = self.services.save().await?;

        support::invalidate(self.cache.as_ref(), Service::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_service(&self, id: ServiceId) -> DomainResult<bool> {
        let mut service = integrity::fetch(self.services.as_ref(), &id, Service::KIND).await?;
        service.disable();
        self.services.update(service).await?;
        let events = self.services.save().await?;

        support::invalidate(self.cache.as_ref(), Service::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_service(&self, id: ServiceId) -> DomainResult<bool> {
        let mut service = integrity::fetch(self.services.as_ref(), &id, Service::KIND).await?;
        service.activate();
        self.services.update(service).await?;
        let events = self.services.save().await?;

        support::invalidate(self.cache.as_ref(), Service::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_service(&self, id: &ServiceId) -> DomainResult<Service> {
        support::cached_get(self.cache.as_ref(), self.services.as_ref(), id, Service::KIND).await
    }

    pub async fn list_services(&self, query: ListServices) -> DomainResult<Page<Service>> {
        let page = query.page.unwrap_or_else(default_page);
        self.services.page(&query.filter, &page).await
    }

    // --- Tier ---

    pub async fn create_tier(&self, cmd: CreateTier) -> DomainResult<TierId> {
        let mut rules = Violations::new();
        rules.require_non_blank(&cmd.code, "code");
        rules.require_non_blank(&cmd.name, "name");
        tier_bounds_rules(&mut rules, &cmd.floor, &cmd.ceiling);
        rules.finish()?;

        let id = TierId::new(EntityId::new());
        integrity::ensure_unique(
            self.tiers.as_ref(),
            TierFilter {
                code: Some(cmd.code.clone()),
                ..TierFilter::default()
            },
            &id,
            Tier::KIND,
            &cmd.code,
        )
        .await?;

        let tier = Tier::create(id, cmd.code, cmd.name, cmd.floor, cmd.ceiling);
        self.tiers.add(tier).await?;
        let events = self.tiers.save().await?;

        support::invalidate(self.cache.as_ref(), Tier::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_tier(&self, cmd: UpdateTier) -> DomainResult<TierId> {
        let mut rules = Violations::new();
        rules.require_non_blank(&cmd.code, "code");
        rules.require_non_blank(&cmd.name, "name");
        tier_bounds_rules(&mut rules, &cmd.floor, &cmd.ceiling);
        rules.finish()?;

        let mut tier = integrity::fetch(self.tiers.as_ref(), &cmd.id, Tier::KIND).await?;
        integrity::ensure_unique(
            self.tiers.as_ref(),
            TierFilter {
                code: Some(cmd.code.clone()),
                ..TierFilter::default()
            },
            &cmd.id,
            Tier::KIND,
            &cmd.code,
        )
        .await?;

        tier.update(cmd.code, cmd.name, cmd.floor, cmd.ceiling);
        self.tiers.update(tier.clone()).await?;
        let events = self.tiers.save().await?;

        support::refresh(self.cache.as_ref(), &tier).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_tier(&self, cmd: PatchTier) -> DomainResult<TierId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(name) = cmd.patch.name.as_deref() {
            rules.require_non_blank(name, "name");
        }
        rules.finish()?;

        let mut tier = integrity::fetch(self.tiers.as_ref(), &cmd.id, Tier::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.tiers.as_ref(),
                TierFilter {
                    code: Some(code.clone()),
                    ..TierFilter::default()
                },
                &cmd.id,
                Tier::KIND,
                code,
            )
            .await?;
        }

        // Bound coherence is validated against the post-merge values.
        let floor = cmd.patch.floor.clone().unwrap_or_else(|| tier.floor().clone());
        let ceiling = cmd.patch.ceiling.clone().unwrap_or_else(|| tier.ceiling().clone());
        let mut bound_rules = Violations::new();
        tier_bounds_rules(&mut bound_rules, &floor, &ceiling);
        bound_rules.finish()?;

        tier.patch(cmd.patch);
        self.tiers.update(tier).await?;
        let events = self.tiers.save().await?;

        support::invalidate(self.cache.as_ref(), Tier::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_tier(&self, id: TierId) -> DomainResult<bool> {
        let mut tier = integrity::fetch(self.tiers.as_ref(), &id, Tier::KIND).await?;
        integrity::ensure_not_in_use(
            self.agency_tiers.as_ref(),
            AgencyTierFilter {
                tier_id: Some(id),
                ..AgencyTierFilter::default()
            },
            Tier::KIND,
            AgencyTier::KIND,
        )
        .await?;

        tier.disable();
        self.tiers.update(tier).await?;
        let events = self.tiers.save().await?;

        support::invalidate(self.cache.as_ref(), Tier::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_tier(&self, id: TierId) -> DomainResult<bool> {
        let mut tier = integrity::fetch(self.tiers.as_ref(), &id, Tier::KIND).await?;
        tier.activate();
        self.tiers.update(tier).await?;
        let events = self.tiers.save().await?;

        support::invalidate(self.cache.as_ref(), Tier::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_tier(&self, id: &TierId) -> DomainResult<Tier> {
        support::cached_get(self.cache.as_ref(), self.tiers.as_ref(), id, Tier::KIND).await
    }

    pub async fn list_tiers(&self, query: ListTiers) -> DomainResult<Page<Tier>> {
        let page = query.page.unwrap_or_else(default_page);
        self.tiers.page(&query.filter, &page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdata_cache::MemoryCache;
    use refdata_core::{DomainError, Entity};
    use refdata_events::InMemoryEventBus;
    use refdata_network::{AgencyId, AgencyTierId};
    use refdata_store::MemoryRepository;

    struct Fixture {
        registry: CatalogRegistry,
        agency_tiers: Arc<MemoryRepository<AgencyTier>>,
    }

    fn fixture() -> Fixture {
        let agency_tiers = Arc::new(MemoryRepository::<AgencyTier>::new());
        let registry = CatalogRegistry::new(
            Arc::new(MemoryRepository::<Product>::new()),
            Arc::new(MemoryRepository::<Service>::new()),
            Arc::new(MemoryRepository::<Tier>::new()),
            agency_tiers.clone(),
            Arc::new(MemoryCache::new()),
            Arc::new(InMemoryEventBus::<LifecycleEvent>::new()),
        );
        Fixture {
            registry,
            agency_tiers,
        }
    }

    fn mad(amount: i64) -> Money {
        Money::new(amount, "MAD").unwrap()
    }

    #[tokio::test]
    async fn product_with_services_cannot_be_disabled() {
        let f = fixture();
        let product = f
            .registry
            .create_product(CreateProduct {
                code: "TRF".into(),
                name: "Cash transfer".into(),
                description: None,
            })
            .await
            .unwrap();
        f.registry
            .create_service(CreateService {
                product_id: product,
                code: "TRF-EXP".into(),
                name: "Express".into(),
            })
            .await
            .unwrap();

        let err = f.registry.disable_product(product).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::resource_in_use(Product::KIND, Service::KIND)
        );

        // After the service is disabled it no longer blocks.
        let services = f
            .registry
            .list_services(ListServices::default())
            .await
            .unwrap();
        f.registry
            .disable_service(*services.items[0].id())
            .await
            .unwrap();
        assert!(f.registry.disable_product(product).await.unwrap());
    }

    #[tokio::test]
    async fn tier_bounds_are_validated_against_the_post_merge_state() {
        let f = fixture();
        let tier = f
            .registry
            .create_tier(CreateTier {
                code: "T1".into(),
                name: "0-1000".into(),
                floor: mad(0),
                ceiling: mad(100_000),
            })
            .await
            .unwrap();

        // Patching the floor above the kept ceiling must fail.
        let err = f
            .registry
            .patch_tier(PatchTier {
                id: tier,
                patch: TierPatch {
                    floor: Some(mad(200_000)),
                    ..TierPatch::default()
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // The failed patch must not have left partial state behind.
        let unchanged = f.registry.get_tier(&tier).await.unwrap();
        assert_eq!(unchanged.floor().amount_minor(), 0);
    }

    #[tokio::test]
    async fn tier_create_rejects_mismatched_currencies() {
        let f = fixture();
        let err = f
            .registry
            .create_tier(CreateTier {
                code: "T1".into(),
                name: "0-1000".into(),
                floor: Money::new(0, "MAD").unwrap(),
                ceiling: Money::new(100_000, "EUR").unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn tier_assigned_to_an_agency_cannot_be_disabled() {
        let f = fixture();
        let tier = f
            .registry
            .create_tier(CreateTier {
                code: "T1".into(),
                name: "0-1000".into(),
                floor: mad(0),
                ceiling: mad(100_000),
            })
            .await
            .unwrap();

        let link = AgencyTier::create(
            AgencyTierId::new(EntityId::new()),
            AgencyId::new(EntityId::new()),
            tier,
            "STD".into(),
            150,
        );
        f.agency_tiers.add(link).await.unwrap();
        f.agency_tiers.save().await.unwrap();

        let err = f.registry.disable_tier(tier).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::resource_in_use(Tier::KIND, AgencyTier::KIND)
        );
    }
}
