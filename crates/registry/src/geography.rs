//! Geography handlers: Region, City, Sector, Corridor.

use std::sync::Arc;

use refdata_cache::Cache;
use refdata_core::{DomainResult, EntityId, Page, PageRequest, Referential, Violations};
use refdata_events::{EventBus, LifecycleEvent};
use refdata_geography::{
    City, CityFilter, CityId, CityPatch, Corridor, CorridorFilter, CorridorId, CorridorPatch,
    Region, RegionFilter, RegionId, RegionPatch, Sector, SectorFilter, SectorId, SectorPatch,
};
use refdata_network::{Agency, AgencyFilter};
use refdata_store::{Repository, integrity};

use crate::support;

// -------------------------
// Commands & queries
// -------------------------

#[derive(Debug, Clone)]
pub struct CreateRegion {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateRegion {
    pub id: RegionId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PatchRegion {
    pub id: RegionId,
    pub patch: RegionPatch,
}

#[derive(Debug, Clone)]
pub struct CreateCity {
    pub region_id: RegionId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCity {
    pub id: CityId,
    pub region_id: RegionId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PatchCity {
    pub id: CityId,
    pub patch: CityPatch,
}

#[derive(Debug, Clone)]
pub struct CreateSector {
    pub city_id: CityId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSector {
    pub id: SectorId,
    pub city_id: CityId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PatchSector {
    pub id: SectorId,
    pub patch: SectorPatch,
}

#[derive(Debug, Clone)]
pub struct CreateCorridor {
    pub city_id: CityId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCorridor {
    pub id: CorridorId,
    pub city_id: CityId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PatchCorridor {
    pub id: CorridorId,
    pub patch: CorridorPatch,
}

#[derive(Debug, Clone, Default)]
pub struct ListRegions {
    pub filter: RegionFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListCities {
    pub filter: CityFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListSectors {
    pub filter: SectorFilter,
    pub page: Option<PageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ListCorridors {
    pub filter: CorridorFilter,
    pub page: Option<PageRequest>,
}

fn code_name_rules(code: &str, name: &str) -> DomainResult<()> {
    let mut rules = Violations::new();
    rules.require_non_blank(code, "code");
    rules.require_non_blank(name, "name");
    rules.finish()
}

fn patched_code_name_rules(code: Option<&str>, name: Option<&str>) -> DomainResult<()> {
    let mut rules = Violations::new();
    if let Some(code) = code {
        rules.require_non_blank(code, "code");
    }
    if let Some(name) = name {
        rules.require_non_blank(name, "name");
    }
    rules.finish()
}

fn default_page() -> PageRequest {
    // new(1, 20) is statically in range.
    PageRequest::new(1, 20).expect("default page request is valid")
}

// -------------------------
// Handlers
// -------------------------

/// Handlers for the territorial records. Holds the agency port as well
/// because disabling a city must consult its agencies.
pub struct GeographyRegistry {
    regions: Arc<dyn Repository<Region>>,
    cities: Arc<dyn Repository<City>>,
    sectors: Arc<dyn Repository<Sector>>,
    corridors: Arc<dyn Repository<Corridor>>,
    agencies: Arc<dyn Repository<Agency>>,
    cache: Arc<dyn Cache>,
    bus: Arc<dyn EventBus<LifecycleEvent>>,
}

impl GeographyRegistry {
    pub fn new(
        regions: Arc<dyn Repository<Region>>,
        cities: Arc<dyn Repository<City>>,
        sectors: Arc<dyn Repository<Sector>>,
        corridors: Arc<dyn Repository<Corridor>>,
        agencies: Arc<dyn Repository<Agency>>,
        cache: Arc<dyn Cache>,
        bus: Arc<dyn EventBus<LifecycleEvent>>,
    ) -> Self {
        Self {
            regions,
            cities,
            sectors,
            corridors,
            agencies,
            cache,
            bus,
        }
    }

    // --- Region ---

    pub async fn create_region(&self, cmd: CreateRegion) -> DomainResult<RegionId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = RegionId::new(EntityId::new());
        integrity::ensure_unique(
            self.regions.as_ref(),
            RegionFilter {
                code: Some(cmd.code.clone()),
                ..RegionFilter::default()
            },
            &id,
            Region::KIND,
            &cmd.code,
        )
        .await?;

        let region = Region::create(id, cmd.code, cmd.name);
        self.regions.add(region).await?;
        let events = self.regions.save().await?;

        support::invalidate(self.cache.as_ref(), Region::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_region(&self, cmd: UpdateRegion) -> DomainResult<RegionId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut region = integrity::fetch(self.regions.as_ref(), &cmd.id, Region::KIND).await?;
        integrity::ensure_unique(
            self.regions.as_ref(),
            RegionFilter {
                code: Some(cmd.code.clone()),
                ..RegionFilter::default()
            },
            &cmd.id,
            Region::KIND,
            &cmd.code,
        )
        .await?;

        region.update(cmd.code, cmd.name);
        self.regions.update(region.clone()).await?;
        let events = self.regions.save().await?;

        support::refresh(self.cache.as_ref(), &region).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_region(&self, cmd: PatchRegion) -> DomainResult<RegionId> {
        patched_code_name_rules(cmd.patch.code.as_deref(), cmd.patch.name.as_deref())?;
        let mut region = integrity::fetch(self.regions.as_ref(), &cmd.id, Region::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.regions.as_ref(),
                RegionFilter {
                    code: Some(code.clone()),
                    ..RegionFilter::default()
                },
                &cmd.id,
                Region::KIND,
                code,
            )
            .await?;
        }

        region.patch(cmd.patch);
        self.regions.update(region).await?;
        let events = self.regions.save().await?;

        support::invalidate(self.cache.as_ref(), Region::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_region(&self, id: RegionId) -> DomainResult<bool> {
        let mut region = integrity::fetch(self.regions.as_ref(), &id, Region::KIND).await?;
        integrity::ensure_not_in_use(
            self.cities.as_ref(),
            CityFilter {
                region_id: Some(id),
                ..CityFilter::default()
            },
            Region::KIND,
            City::KIND,
        )
        .await?;

        region.disable();
        self.regions.update(region).await?;
        let events = self.regions.save().await?;

        support::invalidate(self.cache.as_ref(), Region::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_region(&self, id: RegionId) -> DomainResult<bool> {
        let mut region = integrity::fetch(self.regions.as_ref(), &id, Region::KIND).await?;
        region.activate();
        self.regions.update(region).await?;
        let events = self.regions.save().await?;

        support::invalidate(self.cache.as_ref(), Region::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_region(&self, id: &RegionId) -> DomainResult<Region> {
        support::cached_get(self.cache.as_ref(), self.regions.as_ref(), id, Region::KIND).await
    }

    pub async fn list_regions(&self, query: ListRegions) -> DomainResult<Page<Region>> {
        let page = query.page.unwrap_or_else(default_page);
        self.regions.page(&query.filter, &page).await
    }

    // --- City ---

    pub async fn create_city(&self, cmd: CreateCity) -> DomainResult<CityId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = CityId::new(EntityId::new());
        integrity::ensure_unique(
            self.cities.as_ref(),
            CityFilter {
                code: Some(cmd.code.clone()),
                ..CityFilter::default()
            },
            &id,
            City::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.regions.as_ref(), &cmd.region_id, Region::KIND).await?;

        let city = City::create(id, cmd.region_id, cmd.code, cmd.name);
        self.cities.add(city).await?;
        let events = self.cities.save().await?;

        support::invalidate(self.cache.as_ref(), City::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_city(&self, cmd: UpdateCity) -> DomainResult<CityId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut city = integrity::fetch(self.cities.as_ref(), &cmd.id, City::KIND).await?;
        integrity::ensure_unique(
            self.cities.as_ref(),
            CityFilter {
                code: Some(cmd.code.clone()),
                ..CityFilter::default()
            },
            &cmd.id,
            City::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.regions.as_ref(), &cmd.region_id, Region::KIND).await?;

        city.update(cmd.region_id, cmd.code, cmd.name);
        self.cities.update(city.clone()).await?;
        let events = self.cities.save().await?;

        support::refresh(self.cache.as_ref(), &city).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_city(&self, cmd: PatchCity) -> DomainResult<CityId> {
        patched_code_name_rules(cmd.patch.code.as_deref(), cmd.patch.name.as_deref())?;
        let mut city = integrity::fetch(self.cities.as_ref(), &cmd.id, City::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.cities.as_ref(),
                CityFilter {
                    code: Some(code.clone()),
                    ..CityFilter::default()
                },
                &cmd.id,
                City::KIND,
                code,
            )
            .await?;
        }
        if let Some(region_id) = &cmd.patch.region_id {
            integrity::ensure_exists(self.regions.as_ref(), region_id, Region::KIND).await?;
        }

        city.patch(cmd.patch);
        self.cities.update(city).await?;
        let events = self.cities.save().await?;

        support::invalidate(self.cache.as_ref(), City::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    /// Disable is refused while any enabled agency, sector or corridor still
    /// references the city. Checks run in that order and short-circuit.
    pub async fn disable_city(&self, id: CityId) -> DomainResult<bool> {
        let mut city = integrity::fetch(self.cities.as_ref(), &id, City::KIND).await?;
        integrity::ensure_not_in_use(
            self.agencies.as_ref(),
            AgencyFilter {
                city_id: Some(id),
                ..AgencyFilter::default()
            },
            City::KIND,
            Agency::KIND,
        )
        .await?;
        integrity::ensure_not_in_use(
            self.sectors.as_ref(),
            SectorFilter {
                city_id: Some(id),
                ..SectorFilter::default()
            },
            City::KIND,
            Sector::KIND,
        )
        .await?;
        integrity::ensure_not_in_use(
            self.corridors.as_ref(),
            CorridorFilter {
                city_id: Some(id),
                ..CorridorFilter::default()
            },
            City::KIND,
            Corridor::KIND,
        )
        .await?;

        city.disable();
        self.cities.update(city).await?;
        let events = self.cities.save().await?;

        support::invalidate(self.cache.as_ref(), City::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_city(&self, id: CityId) -> DomainResult<bool> {
        let mut city = integrity::fetch(self.cities.as_ref(), &id, City::KIND).await?;
        city.activate();
        self.cities.update(city).await?;
        let events = self.cities.save().await?;

        support::invalidate(self.cache.as_ref(), City::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_city(&self, id: &CityId) -> DomainResult<City> {
        support::cached_get(self.cache.as_ref(), self.cities.as_ref(), id, City::KIND).await
    }

    pub async fn list_cities(&self, query: ListCities) -> DomainResult<Page<City>> {
        let page = query.page.unwrap_or_else(default_page);
        self.cities.page(&query.filter, &page).await
    }

    // --- Sector ---

    pub async fn create_sector(&self, cmd: CreateSector) -> DomainResult<SectorId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = SectorId::new(EntityId::new());
        integrity::ensure_unique(
            self.sectors.as_ref(),
            SectorFilter {
                code: Some(cmd.code.clone()),
                ..SectorFilter::default()
            },
            &id,
            Sector::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.cities.as_ref(), &cmd.city_id, City::KIND).await?;

        let sector = Sector::create(id, cmd.city_id, cmd.code, cmd.name);
        self.sectors.add(sector).await?;
        let events = self.sectors.save().await?;

        support::invalidate(self.cache.as_ref(), Sector::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_sector(&self, cmd: UpdateSector) -> DomainResult<SectorId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut sector = integrity::fetch(self.sectors.as_ref(), &cmd.id, Sector::KIND).await?;
        integrity::ensure_unique(
            self.sectors.as_ref(),
            SectorFilter {
                code: Some(cmd.code.clone()),
                ..SectorFilter::default()
            },
            &cmd.id,
            Sector::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.cities.as_ref(), &cmd.city_id, City::KIND).await?;

        sector.update(cmd.city_id, cmd.code, cmd.name);
        self.sectors.update(sector.clone()).await?;
        let events = self.sectors.save().await?;

        support::refresh(self.cache.as_ref(), &sector).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_sector(&self, cmd: PatchSector) -> DomainResult<SectorId> {
        patched_code_name_rules(cmd.patch.code.as_deref(), cmd.patch.name.as_deref())?;
        let mut sector = integrity::fetch(self.sectors.as_ref(), &cmd.id, Sector::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.sectors.as_ref(),
                SectorFilter {
                    code: Some(code.clone()),
                    ..SectorFilter::default()
                },
                &cmd.id,
                Sector::KIND,
                code,
            )
            .await?;
        }
        if let Some(city_id) = &cmd.patch.city_id {
            integrity::ensure_exists(self.cities.as_ref(), city_id, City::KIND).await?;
        }

        sector.patch(cmd.patch);
        self.sectors.update(sector).await?;
        let events = self.sectors.save().await?;

        support::invalidate(self.cache.as_ref(), Sector::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_sector(&self, id: SectorId) -> DomainResult<bool> {
        let mut sector = integrity::fetch(self.sectors.as_ref(), &id, Sector::KIND).await?;
        sector.disable();
        self.sectors.update(sector).await?;
        let events = self.sectors.save().await?;

        support::invalidate(self.cache.as_ref(), Sector::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_sector(&self, id: SectorId) -> DomainResult<bool> {
        let mut sector = integrity::fetch(self.sectors.as_ref(), &id, Sector::KIND).await?;
        sector.activate();
        self.sectors.update(sector).await?;
        let events = self.sectors.save().await?;

        support::invalidate(self.cache.as_ref(), Sector::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_sector(&self, id: &SectorId) -> DomainResult<Sector> {
        support::cached_get(self.cache.as_ref(), self.sectors.as_ref(), id, Sector::KIND).await
    }

    pub async fn list_sectors(&self, query: ListSectors) -> DomainResult<Page<Sector>> {
        let page = query.page.unwrap_or_else(default_page);
        self.sectors.page(&query.filter, &page).await
    }

    // --- Corridor ---

    pub async fn create_corridor(&self, cmd: CreateCorridor) -> DomainResult<CorridorId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let id = CorridorId::new(EntityId::new());
        integrity::ensure_unique(
            self.corridors.as_ref(),
            CorridorFilter {
                code: Some(cmd.code.clone()),
                ..CorridorFilter::default()
            },
            &id,
            Corridor::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.cities.as_ref(), &cmd.city_id, City::KIND).await?;

        let corridor = Corridor::create(id, cmd.city_id, cmd.code, cmd.name);
        self.corridors.add(corridor).await?;
        let events = self.corridors.save().await?;

        support::invalidate(self.cache.as_ref(), Corridor::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(id)
    }

    pub async fn update_corridor(&self, cmd: UpdateCorridor) -> DomainResult<CorridorId> {
        code_name_rules(&cmd.code, &cmd.name)?;
        let mut corridor =
            integrity::fetch(self.corridors.as_ref(), &cmd.id, Corridor::KIND).await?;
        integrity::ensure_unique(
            self.corridors.as_ref(),
            CorridorFilter {
                code: Some(cmd.code.clone()),
                ..CorridorFilter::default()
            },
            &cmd.id,
            Corridor::KIND,
            &cmd.code,
        )
        .await?;
        integrity::ensure_exists(self.cities.as_ref(), &cmd.city_id, City::KIND).await?;

        corridor.update(cmd.city_id, cmd.code, cmd.name);
        self.corridors.update(corridor.clone()).await?;
        let events = self.corridors.save().await?;

        support::refresh(self.cache.as_ref(), &corridor).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn patch_corridor(&self, cmd: PatchCorridor) -> DomainResult<CorridorId> {
        patched_code_name_rules(cmd.patch.code.as_deref(), cmd.patch.name.as_deref())?;
        let mut corridor =
            integrity::fetch(self.corridors.as_ref(), &cmd.id, Corridor::KIND).await?;
        if let Some(code) = &cmd.patch.code {
            integrity::ensure_unique(
                self.corridors.as_ref(),
                CorridorFilter {
                    code: Some(code.clone()),
                    ..CorridorFilter::default()
                },
                &cmd.id,
                Corridor::KIND,
                code,
            )
            .await?;
        }
        if let Some(city_id) = &cmd.patch.city_id {
            integrity::ensure_exists(self.cities.as_ref(), city_id, City::KIND).await?;
        }

        corridor.patch(cmd.patch);
        self.corridors.update(corridor).await?;
        let events = self.corridors.save().await?;

        support::invalidate(self.cache.as_ref(), Corridor::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(cmd.id)
    }

    pub async fn disable_corridor(&self, id: CorridorId) -> DomainResult<bool> {
        let mut corridor = integrity::fetch(self.corridors.as_ref(), &id, Corridor::KIND).await?;
        corridor.disable();
        self.corridors.update(corridor).await?;
        let events = self.corridors.save().await?;

        support::invalidate(self.cache.as_ref(), Corridor::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn activate_corridor(&self, id: CorridorId) -> DomainResult<bool> {
        let mut corridor = integrity::fetch(self.corridors.as_ref(), &id, Corridor::KIND).await?;
        corridor.activate();
        self.corridors.update(corridor).await?;
        let events = self.corridors.save().await?;

        support::invalidate(self.cache.as_ref(), Corridor::KIND).await;
        support::publish(self.bus.as_ref(), events);
        Ok(true)
    }

    pub async fn get_corridor(&self, id: &CorridorId) -> DomainResult<Corridor> {
        support::cached_get(self.cache.as_ref(), self.corridors.as_ref(), id, Corridor::KIND)
            .await
    }

    pub async fn list_corridors(&self, query: ListCorridors) -> DomainResult<Page<Corridor>> {
        let page = query.page.unwrap_or_else(default_page);
        self.corridors.page(&query.filter, &page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdata_cache::MemoryCache;
    use refdata_core::DomainError;
    use refdata_events::InMemoryEventBus;
    use refdata_network::{AgencyId, Agency};
    use refdata_store::MemoryRepository;

    struct Fixture {
        registry: GeographyRegistry,
        agencies: Arc<MemoryRepository<Agency>>,
        bus: Arc<InMemoryEventBus<LifecycleEvent>>,
    }

    fn fixture() -> Fixture {
        let agencies = Arc::new(MemoryRepository::<Agency>::new());
        let bus = Arc::new(InMemoryEventBus::<LifecycleEvent>::new());
        let registry = GeographyRegistry::new(
            Arc::new(MemoryRepository::<Region>::new()),
            Arc::new(MemoryRepository::<City>::new()),
            Arc::new(MemoryRepository::<Sector>::new()),
            Arc::new(MemoryRepository::<Corridor>::new()),
            agencies.clone(),
            Arc::new(MemoryCache::new()),
            bus.clone(),
        );
        Fixture {
            registry,
            agencies,
            bus,
        }
    }

    async fn casablanca(registry: &GeographyRegistry) -> CityId {
        let region = registry
            .create_region(CreateRegion {
                code: "R05".into(),
                name: "Casablanca-Settat".into(),
            })
            .await
            .unwrap();
        registry
            .create_city(CreateCity {
                region_id: region,
                code: "CAS".into(),
                name: "Casablanca".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn city_with_a_sector_cannot_be_disabled() {
        let f = fixture();
        let city = casablanca(&f.registry).await;
        f.registry
            .create_sector(CreateSector {
                city_id: city,
                code: "S01".into(),
                name: "Maarif".into(),
            })
            .await
            .unwrap();

        let err = f.registry.disable_city(city).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::resource_in_use(City::KIND, Sector::KIND)
        );

        // The target must not have been mutated.
        let city = f.registry.get_city(&city).await.unwrap();
        assert!(city.is_enabled());
    }

    #[tokio::test]
    async fn city_with_an_agency_cannot_be_disabled() {
        let f = fixture();
        let city = casablanca(&f.registry).await;

        let agency = Agency::create(
            AgencyId::new(EntityId::new()),
            city,
            "AG-001".into(),
            "Agence Anfa".into(),
            None,
        );
        f.agencies.add(agency).await.unwrap();
        f.agencies.save().await.unwrap();

        let err = f.registry.disable_city(city).await.unwrap_err();
        assert_eq!(err, DomainError::resource_in_use(City::KIND, Agency::KIND));
    }

    #[tokio::test]
    async fn city_without_dependents_disables_and_stays_readable() {
        let f = fixture();
        let city = casablanca(&f.registry).await;

        assert!(f.registry.disable_city(city).await.unwrap());

        let disabled = f.registry.get_city(&city).await.unwrap();
        assert!(!disabled.is_enabled());

        // Hidden from the default (enabled-only) listing...
        let page = f.registry.list_cities(ListCities::default()).await.unwrap();
        assert_eq!(page.total_count, 0);

        // ...but visible when disabled records are asked for.
        let page = f
            .registry
            .list_cities(ListCities {
                filter: CityFilter {
                    enabled: Some(false),
                    ..CityFilter::default()
                },
                page: None,
            })
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn sector_creation_requires_an_existing_city() {
        let f = fixture();
        let ghost = CityId::new(EntityId::new());
        let err = f
            .registry
            .create_sector(CreateSector {
                city_id: ghost,
                code: "S01".into(),
                name: "Maarif".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ReferenceNotFound { .. }));
    }

    #[tokio::test]
    async fn create_city_rejects_blank_code_and_name_together() {
        let f = fixture();
        let region = f
            .registry
            .create_region(CreateRegion {
                code: "R05".into(),
                name: "Casablanca-Settat".into(),
            })
            .await
            .unwrap();
        let err = f
            .registry
            .create_city(CreateCity {
                region_id: region,
                code: "  ".into(),
                name: "".into(),
            })
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(rules) => assert_eq!(rules.len(), 2),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_to_a_taken_code_is_rejected_but_own_code_is_fine() {
        let f = fixture();
        let region = f
            .registry
            .create_region(CreateRegion {
                code: "R05".into(),
                name: "Casablanca-Settat".into(),
            })
            .await
            .unwrap();
        let cas = f
            .registry
            .create_city(CreateCity {
                region_id: region,
                code: "CAS".into(),
                name: "Casablanca".into(),
            })
            .await
            .unwrap();
        let rba = f
            .registry
            .create_city(CreateCity {
                region_id: region,
                code: "RBA".into(),
                name: "Rabat".into(),
            })
            .await
            .unwrap();

        let err = f
            .registry
            .update_city(UpdateCity {
                id: rba,
                region_id: region,
                code: "CAS".into(),
                name: "Rabat".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));

        // Re-writing a record under its own key succeeds.
        f.registry
            .update_city(UpdateCity {
                id: cas,
                region_id: region,
                code: "CAS".into(),
                name: "Grand Casablanca".into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn region_with_a_city_cannot_be_disabled() {
        let f = fixture();
        let region = f
            .registry
            .create_region(CreateRegion {
                code: "R05".into(),
                name: "Casablanca-Settat".into(),
            })
            .await
            .unwrap();
        f.registry
            .create_city(CreateCity {
                region_id: region,
                code: "CAS".into(),
                name: "Casablanca".into(),
            })
            .await
            .unwrap();

        let err = f.registry.disable_region(region).await.unwrap_err();
        assert_eq!(err, DomainError::resource_in_use(Region::KIND, City::KIND));
    }

    #[tokio::test]
    async fn lifecycle_events_reach_bus_subscribers() {
        let f = fixture();
        let sub = f.bus.subscribe();
        casablanca(&f.registry).await;

        let first = sub.try_recv().unwrap();
        assert_eq!(first.event_type(), "geography.region.created");
        let second = sub.try_recv().unwrap();
        assert_eq!(second.event_type(), "geography.city.created");
    }

    #[tokio::test]
    async fn pagination_slices_and_counts_the_full_match_set() {
        let f = fixture();
        let region = f
            .registry
            .create_region(CreateRegion {
                code: "R05".into(),
                name: "Casablanca-Settat".into(),
            })
            .await
            .unwrap();
        for code in ["CAS", "RBA", "TNG", "FES", "AGA"] {
            f.registry
                .create_city(CreateCity {
                    region_id: region,
                    code: code.into(),
                    name: format!("City {code}"),
                })
                .await
                .unwrap();
        }

        let page1 = f
            .registry
            .list_cities(ListCities {
                filter: CityFilter::default(),
                page: Some(PageRequest::new(1, 2).unwrap()),
            })
            .await
            .unwrap();
        assert_eq!(page1.items.len(), 2);
        assert_eq!(page1.total_count, 5);

        // Every page together covers the whole match set exactly once.
        let mut seen = 0;
        for n in 1..=3 {
            let page = f
                .registry
                .list_cities(ListCities {
                    filter: CityFilter::default(),
                    page: Some(PageRequest::new(n, 2).unwrap()),
                })
                .await
                .unwrap();
            seen += page.items.len();
        }
        assert_eq!(seen as u64, page1.total_count);
    }
}
