//! Network handlers: Agency, AgencyTier, Partner.

use std::sync::Arc;

use refdata_cache::Cache;
use refdata_catalog::{Tier, TierId};
use refdata_core::{DomainResult, EntityId, Page, PageRequest, Referential, Violations};
use refdata_events::{EventBus, LifecycleEvent};
use refdata_geography::{City, CityId};
use refdata_network::{
    Agency, AgencyFilter, AgencyId, AgencyPatch, AgencyTier, AgencyTierFilter, AgencyTierId,
    AgencyTierPatch, Partner, PartnerFilter, PartnerId, PartnerPatch,
};
use refdata_store::{Repository, integrity};

use crate::support;

// -------------------------
// Commands & queries
// -------------------------

#[derive(Debug, Clone)]
pub struct CreateAgency {
    pub city_id: CityId,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateAgency {
    pub id: AgencyId,
    pub city_id: CityId,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PatchAgency {
    pub id: AgencyId,
    pub patch: AgencyPatch,
}

#[derive(Debug, Clone)]
pub struct CreateAgencyTier {
    pub agency_id: AgencyId,
    pub tier_id: TierId,
    pub code: String,
    pub commission_bps: u32,
}

#[derive(Debug, Clone)]
pub struct UpdateAgencyTier {
    pub id: AgencyTierId,
    pub agency_id: AgencyId,
    pub tier_id: TierId,
    pub code: String,
    pub commission_bps: u32,
}

#[derive(Debug, Clone)]
pub struct PatchAgencyTier {
    pub id: AgencyTierId,
    pub patch: AgencyTierPatch,
}

#[derive(Debug, Clone)]
pub struct CreatePartner {
    pub code: String,
    pub name: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePartner {
    pub id: PartnerId,
    pub code: String,
    pub name: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PatchPartner {
    pub id: PartnerId,
    pub patch: PartnerPatch,
}

#[derive(Debug, Clone, Default)]
pub struct ListAgencies {
    pub filter: AgencyFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListAgencyTiers {
    pub filter: AgencyTierFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListPartners {
    pub filter: PartnerFilter,
    pub page: Option<PageRequest>,
}

fn code_name_rules(code: &str, name: &str) -> DomainResult<()> {
    let mut rules = Violations::new();
    rules.require_non_blank(code, "code");
    rules.require_non_blank(name, "name");
    rules.finish()
}

fn default_page() -> PageRequest {
    PageRequest::new(1, 20).expect("default page request is valid")
}

/// Probe matching the composite (agency, tier, code) key among enabled links.
fn pair_probe(agency_id: AgencyId, tier_id: TierId, code: &str) -> AgencyTierFilter {
    AgencyTierFilter {
        agency_id: Some(agency_id),
        tier_id: Some(tier_id),
        code: Some(code.to_string()),
        ..AgencyTierFilter::default()
    }
}

// -------------------------
// Handlers
// -------------------------

pub struct NetworkRegistry {
    agencies: Arc<dyn Repository<Agency>>,
    agency_tiers: Arc<dyn Repository<AgencyTier>>,
    partners: Arc<dyn Repository<Partner>>,
    cities: Arc<dyn Repository<City>>,
    tiers: Arc<dyn Repository<Tier>>,
    cache: Arc<dyn Cache>,
    bus: Arc<dyn EventBus<LifecycleEvent>>,
}

impl NetworkRegistry {
    pub fn new(
        agencies: Arc<dyn Repository<Agency>>,
        agency_tiers: Arc<dyn Repository<AgencyTier>>,
        partners: Arc<dyn Repository<Partner>>,
        cities: Arc<dyn Repository<City>>,
        tiers: Arc<dyn Repository<Tier>>,
        cache: Arc<dyn Cache>,
        bus: Arc<dyn EventBus<LifecycleEvent>>,
    ) -> Self {
        Self {
            agencies,
            agency_tiers,
            partners,
            cities,
            tiers,
            cache,
            bus,
        }
    }

    // --- Agency ---

    pub async fn create_agency(&self, cmd: CreateAgency) -> DomainResult<AgencyId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = AgencyId::new(EntityId::new());
        integrity::ensure_unique(
            self.agencies.as_ref(),
            AgencyFilter {
                code: Some(cmd.code.clone()),
                ..AgencyFilter::default()
            },
            &id,
            Agency::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.cities.as_ref(), &cmd.city_id, City::KIND).await?;

        let agency = Agency::create(id, cmd.city_id, cmd.code, cmd.name, cmd.address);
        self.agencies.add(agency).await?;
        let events = self.agencies.save().await?;

        support::invalidate(self.cache.as_ref(), Agency::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_agency(&self, cmd: UpdateAgency) -> DomainResult<AgencyId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut agency = integrity::fetch(self.agencies.as_ref(), &cmd.id, Agency::KIND).await?;
        integrity::ensure_unique(
            self.agencies.as_ref(),
            AgencyFilter {
                code: Some(cmd.code.clone()),
                ..AgencyFilter::default()
            },
            &cmd.id,
            Agency::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.cities.as_ref(), &cmd.city_id, City::KIND).await?;

        agency.update(cmd.city_id, cmd.code, cmd.name, cmd.address);
        self.agencies.update(agency.clone()).await?;
        let events = self.agencies.save().await?;

        support::refresh(self.cache.as_ref(), &agency).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_agency(&self, cmd: PatchAgency) -> DomainResult<AgencyId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(name) = cmd.patch.name.as_deref() {
            rules.require_non_blank(name, "name");
        }
        rules.finish()?;

        let mut agency = integrity::fetch(self.agencies.as_ref(), &cmd.id, Agency::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.agencies.as_ref(),
                AgencyFilter {
                    code: Some(code.clone()),
                    ..AgencyFilter::default()
                },
                &cmd.id,
                Agency::KIND,
                code,
            )
            .await?;
        }
        if let Some(city_id) = &cmd.patch.city_id {
            integrity::ensure_exists(self.cities.as_ref(), city_id, City::KIND).await?;
        }

        agency.patch(cmd.patch);
        self.agencies.update(agency).await?;
        let events = self.agencies.save().await?;

        support::invalidate(self.cache.as_ref(), Agency::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_agency(&self, id: AgencyId) -> DomainResult<bool> {
        let mut agency = integrity::fetch(self.agencies.as_ref(), &id, Agency::KIND).await?;
        integrity::ensure_not_in_use(
            self.agency_tiers.as_ref(),
            AgencyTierFilter {
                agency_id: Some(id),
                ..AgencyTierFilter::default()
            },
            Agency::KIND,
            AgencyTier::KIND,
        )
        .await?;

        agency.disable();
        self.agencies.update(agency).await?;
        let events = self.agencies.save().await?;

        support::invalidate(self.cache.as_ref(), Agency::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_agency(&self, id: AgencyId) -> DomainResult<bool> {
        let mut agency = integrity::fetch(self.agencies.as_ref(), &id, Agency::KIND).await?;
        agency.activate();
        self.agencies.update(agency).await?;
        let events = self.agencies.save().await?;

        support::invalidate(self.cache.as_ref(), Agency::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_agency(&self, id: &AgencyId) -> DomainResult<Agency> {
        support::cached_get(self.cache.as_ref(), self.agencies.as_ref(), id, Agency::KIND).await
    }

    pub async fn list_agencies(&self, query: ListAgencies) -> DomainResult<Page<Agency>> {
        let page = query.page.unwrap_or_else(default_page);
        self.agencies.page(&query.filter, &page).await
    }

    // --- AgencyTier ---

    pub async fn create_agency_tier(&self, cmd: CreateAgencyTier) -> DomainResult<AgencyTierId> {
        let mut rules = Violations::new();
        rules.require_non_blank(&cmd.code, "code");
        rules.finish()?;

        let id = AgencyTierId::new(EntityId::new());
        integrity::ensure_unique(
            self.agency_tiers.as_ref(),
            pair_probe(cmd.agency_id, cmd.tier_id, &cmd.code),
            &id,
            AgencyTier::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.agencies.as_ref(), &cmd.agency_id, Agency::KIND).await?;
        integrity::ensure_exists(self.tiers.as_ref(), &cmd.tier_id, Tier::KIND).await?;

        let link = AgencyTier::create(id, cmd.agency_id, cmd.tier_id, cmd.code, cmd.commission_bps);
        self.agency_tiers.add(link).await?;
        let events = self.agency_tiers.save().await?;

        support::invalidate(self.cache.as_ref(), AgencyTier::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_agency_tier(&self, cmd: UpdateAgencyTier) -> DomainResult<AgencyTierId> {
        let mut rules = Violations::new();
        rules.require_non_blank(&cmd.code, "code");
        rules.finish()?;

        let mut link =
            integrity::fetch(self.agency_tiers.as_ref(), &cmd.id, AgencyTier::KIND).await?;
        integrity::ensure_unique(
            self.agency_tiers.as_ref(),
            pair_probe(cmd.agency_id, cmd.tier_id, &cmd.code),
            &cmd.id,
            AgencyTier::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.agencies.as_ref(), &cmd.agency_id, Agency::KIND).await?;
        integrity::ensure_exists(self.tiers.as_ref(), &cmd.tier_id, Tier::KIND).await?;

        link.update(cmd.agency_id, cmd.tier_id, cmd.code, cmd.commission_bps);
        self.agency_tiers.update(link.clone()).await?;
        let events = self.agency_tiers.save().await?;

        support::refresh(self.cache.as_ref(), &link).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_agency_tier(&self, cmd: PatchAgencyTier) -> DomainResult<AgencyTierId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        rules.finish()?;

        let mut link =
            integrity::fetch(self.agency_tiers.as_ref(), &cmd.id, AgencyTier::KIND).await?;
        if let Some(agency_id) = &cmd.patch.agency_id {
            integrity::ensure_exists(self.agencies.as_ref(), agency_id, Agency::KIND).await?;
        }
        if let Some(tier_id) = &cmd.patch.tier_id {
            integrity::ensure_exists(self.tiers.as_ref(), tier_id, Tier::KIND).await?;
        }

        // The composite key is checked against the post-merge triple.
        let agency_id = cmd.patch.agency_id.unwrap_or_else(|| link.agency_id());
        let tier_id = cmd.patch.tier_id.unwrap_or_else(|| link.tier_id());
        let code = cmd
            .patch
            .code
            .clone()
            .unwrap_or_else(|| link.code().to_string());
        integrity::ensure_unique(
            self.agency_tiers.as_ref(),
            pair_probe(agency_id, tier_id, &code),
            &cmd.id,
            AgencyTier::KIND,
            &code,
        )
        .await?;

        link.patch(cmd.patch);
        self.agency_tiers.update(link).await?;
        let events = self.agency_tiers.save().await?;

        support::invalidate(self.cache.as_ref(), AgencyTier::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_agency_tier(&self, id: AgencyTierId) -> DomainResult<bool> {
        let mut link = integrity::fetch(self.agency_tiers.as_ref(), &id, AgencyTier::KIND).await?;
        link.disable();
        self.agency_tiers.update(link).await?;
        let events = self.agency_tiers.save().await?;

        support::invalidate(self.cache.as_ref(), AgencyTier::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_agency_tier(&self, id: AgencyTierId) -> DomainResult<bool> {
        let mut link = integrity::fetch(self.agency_tiers.as_ref(), &id, AgencyTier::KIND).await?;
        link.activate();
        self.agency_tiers.update(link).await?;
        let events = self.agency_tiers.save().await?;

        support::invalidate(self.cache.as_ref(), AgencyTier::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_agency_tier(&self, id: &AgencyTierId) -> DomainResult<AgencyTier> {
        support::cached_get(self.cache.as_ref(), self.agency_tiers.as_ref(), id, AgencyTier::KIND)
            .await
    }

    pub async fn list_agency_tiers(&self, query: ListAgencyTiers) -> DomainResult<Page<AgencyTier>> {
        let page = query.page.unwrap_or_else(default_page);
        self.agency_tiers.page(&query.filter, &page).await
    }

    // --- Partner ---

    pub async fn create_partner(&self, cmd: CreatePartner) -> DomainResult<PartnerId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = PartnerId::new(EntityId::new());
        integrity::ensure_unique(
            self.partners.as_ref(),
            PartnerFilter {
                code: Some(cmd.code.clone()),
                ..PartnerFilter::default()
            },
            &id,
            Partner::KIND,
            &cmd.code,
        )
        .await?;

        let partner = Partner::create(id, cmd.code, cmd.name, cmd.contact_email);
        self.partners.add(partner).await?;
        let events = self.partners.save().await?;

        support::invalidate(self.cache.as_ref(), Partner::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_partner(&self, cmd: UpdatePartner) -> DomainResult<PartnerId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut partner = integrity::fetch(self.partners.as_ref(), &cmd.id, Partner::KIND).await?;
        integrity::ensure_unique(
            self.partners.as_ref(),
            PartnerFilter {
                code: Some(cmd.code.clone()),
                ..PartnerFilter::default()
            },
            &cmd.id,
            Partner::KIND,
            &cmd.code,
        )
        .await?;

        partner.update(cmd.code, cmd.name, cmd.contact_email);
        self.partners.update(partner.clone()).await?;
        let events = self.partners.save().await?;

        support::refresh(self.cache.as_ref(), &partner).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_partner(&self, cmd: PatchPartner) -> DomainResult<PartnerId> {
        let mut rules = Violations::new();
        if let Some(code) = cmd.patch.code.as_deref() {
            rules.require_non_blank(code, "code");
        }
        if let Some(name) = cmd.patch.name.as_deref() {
            rules.require_non_blank(name, "name");
        }
        rules.finish()?;

        let mut partner = integrity::fetch(self.partners.as_ref(), &cmd.id, Partner::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.partners.as_ref(),
                PartnerFilter {
                    code: Some(code.clone()),
                    ..PartnerFilter::default()
                },
                &cmd.id,
                Partner::KIND,
                code,
            )
            .await?;
        }

        partner.patch(cmd.patch);
        self.partners.update(partner).await?;
        let events = self.partners.save().await?;

        support::invalidate(self.cache.as_ref(), Partner::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_partner(&self, id: PartnerId) -> DomainResult<bool> {
        let mut partner = integrity::fetch(self.partners.as_ref(), &id, Partner::KIND).await?;
        partner.disable();
        self.partners.update(partner).await?;
        let events = self.partners.save().await?;

        support::invalidate(self.cache.as_ref(), Partner::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_partner(&self, id: PartnerId) -> DomainResult<bool> {
        let mut partner = integrity::fetch(self.partners.as_ref(), &id, Partner::KIND).await?;
        partner.activate();
        self.partners.update(partner).await?;
        let events = self.partners.save().await?;

        support::invalidate(self.cache.as_ref(), Partner::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_partner(&self, id: &PartnerId) -> DomainResult<Partner> {
        support::cached_get(self.cache.as_ref(), self.partners.as_ref(), id, Partner::KIND).await
    }

    pub async fn list_partners(&self, query: ListPartners) -> DomainResult<Page<Partner>> {
        let page = query.page.unwrap_or_else(default_page);
        self.partners.page(&query.filter, &page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdata_cache::MemoryCache;
    use refdata_core::{DomainError, Money};
    use refdata_events::InMemoryEventBus;
    use refdata_geography::RegionId;
    use refdata_store::MemoryRepository;

    struct Fixture {
        registry: NetworkRegistry,
        cities: Arc<MemoryRepository<City>>,
        tiers: Arc<MemoryRepository<Tier>>,
    }

    fn fixture() -> Fixture {
        let cities = Arc::new(MemoryRepository::<City>::new());
        let tiers = Arc::new(MemoryRepository::<Tier>::new());
        let registry = NetworkRegistry::new(
            Arc::new(MemoryRepository::<Agency>::new()),
            Arc::new(MemoryRepository::<AgencyTier>::new()),
            Arc::new(MemoryRepository::<Partner>::new()),
            cities.clone(),
            tiers.clone(),
            Arc::new(MemoryCache::new()),
            Arc::new(InMemoryEventBus::<LifecycleEvent>::new()),
        );
        Fixture {
            registry,
            cities,
            tiers,
        }
    }

    async fn seed_city(cities: &MemoryRepository<City>) -> CityId {
        let id = CityId::new(EntityId::new());
        let city = City::create(id, RegionId::new(EntityId::new()), "CAS".into(), "Casablanca".into());
        cities.add(city).await.unwrap();
        cities.save().await.unwrap();
        id
    }

    async fn seed_tier(tiers: &MemoryRepository<Tier>) -> TierId {
        let id = TierId::new(EntityId::new());
        let tier = Tier::create(
            id,
            "T1".into(),
            "0-1000".into(),
            Money::zero("MAD").unwrap(),
            Money::new(100_000, "MAD").unwrap(),
        );
        tiers.add(tier).await.unwrap();
        tiers.save().await.unwrap();
        id
    }

    #[tokio::test]
    async fn agency_requires_an_existing_city() {
        let f = fixture();
        let err = f
            .registry
            .create_agency(CreateAgency {
                city_id: CityId::new(EntityId::new()),
                code: "AG-001".into(),
                name: "Agence Anfa".into(),
                address: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ReferenceNotFound { .. }));
    }

    #[tokio::test]
    async fn composite_key_collides_only_for_the_same_pair() {
        let f = fixture();
        let city = seed_city(&f.cities).await;
        let tier = seed_tier(&f.tiers).await;

        let first = f
            .registry
            .create_agency(CreateAgency {
                city_id: city,
                code: "AG-001".into(),
                name: "Agence Anfa".into(),
                address: None,
            })
            .await
            .unwrap();
        let second = f
            .registry
            .create_agency(CreateAgency {
                city_id: city,
                code: "AG-002".into(),
                name: "Agence Maarif".into(),
                address: None,
            })
            .await
            .unwrap();

        f.registry
            .create_agency_tier(CreateAgencyTier {
                agency_id: first,
                tier_id: tier,
                code: "STD".into(),
                commission_bps: 150,
            })
            .await
            .unwrap();

        // Same code under a different agency: fine.
        f.registry
            .create_agency_tier(CreateAgencyTier {
                agency_id: second,
                tier_id: tier,
                code: "STD".into(),
                commission_bps: 175,
            })
            .await
            .unwrap();

        // Same (agency, tier, code) triple: collision.
        let err = f
            .registry
            .create_agency_tier(CreateAgencyTier {
                agency_id: first,
                tier_id: tier,
                code: "STD".into(),
                commission_bps: 200,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn agency_with_tier_assignments_cannot_be_disabled() {
        let f = fixture();
        let city = seed_city(&f.cities).await;
        let tier = seed_tier(&f.tiers).await;

        let agency = f
            .registry
            .create_agency(CreateAgency {
                city_id: city,
                code: "AG-001".into(),
                name: "Agence Anfa".into(),
                address: None,
            })
            .await
            .unwrap();
        let link = f
            .registry
            .create_agency_tier(CreateAgencyTier {
                agency_id: agency,
                tier_id: tier,
                code: "STD".into(),
                commission_bps: 150,
            })
            .await
            .unwrap();

        let err = f.registry.disable_agency(agency).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::resource_in_use(Agency::KIND, AgencyTier::KIND)
        );

        f.registry.disable_agency_tier(link).await.unwrap();
        assert!(f.registry.disable_agency(agency).await.unwrap());
    }

    #[tokio::test]
    async fn patching_an_agency_tier_onto_a_taken_triple_is_rejected() {
        let f = fixture();
        let city = seed_city(&f.cities).await;
        let tier = seed_tier(&f.tiers).await;

        let agency = f
            .registry
            .create_agency(CreateAgency {
                city_id: city,
                code: "AG-001".into(),
                name: "Agence Anfa".into(),
                address: None,
            })
            .await
            .unwrap();
        f.registry
            .create_agency_tier(CreateAgencyTier {
                agency_id: agency,
                tier_id: tier,
                code: "STD".into(),
                commission_bps: 150,
            })
            .await
            .unwrap();
        let premium = f
            .registry
            .create_agency_tier(CreateAgencyTier {
                agency_id: agency,
                tier_id: tier,
                code: "PRM".into(),
                commission_bps: 300,
            })
            .await
            .unwrap();

        let err = f
            .registry
            .patch_agency_tier(PatchAgencyTier {
                id: premium,
                patch: AgencyTierPatch {
                    code: Some("STD".into()),
                    ..AgencyTierPatch::default()
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn partner_codes_are_unique_and_patchable() {
        let f = fixture();
        let wu = f
            .registry
            .create_partner(CreatePartner {
                code: "WU".into(),
                name: "Western Union".into(),
                contact_email: None,
            })
            .await
            .unwrap();
        let err = f
            .registry
            .create_partner(CreatePartner {
                code: "WU".into(),
                name: "Wannabe Union".into(),
                contact_email: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));

        f.registry
            .patch_partner(PatchPartner {
                id: wu,
                patch: PartnerPatch {
                    contact_email: Some(Some("ops@wu.example".into())),
                    ..PartnerPatch::default()
                },
            })
            .await
            .unwrap();
        let partner = f.registry.get_partner(&wu).await.unwrap();
        assert_eq!(partner.contact_email(), Some("ops@wu.example"));
        assert_eq!(partner.name(), "Western Union");
    }
}
