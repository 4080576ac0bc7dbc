use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

use crate::city::CityId;

/// Sector identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorId(pub EntityId);

impl SectorId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SectorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Sector (a collection zone inside a city).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    id: SectorId,
    city_id: CityId,
    code: String,
    name: String,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct SectorPatch {
    pub city_id: Option<CityId>,
    pub code: Option<String>,
    pub name: Option<String>,
}

impl Sector {
    pub fn create(id: SectorId, city_id: CityId, code: String, name: String) -> Self {
        let mut sector = Self {
            id,
            city_id,
            code,
            name,
            is_enabled: true,
            events: EventLog::new(),
        };
        sector.raise(LifecycleKind::Created);
        sector
    }

    pub fn update(&mut self, city_id: CityId, code: String, name: String) {
        self.city_id = city_id;
        self.code = code;
        self.name = name;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: SectorPatch) {
        if let Some(city_id) = patch.city_id {
            self.city_id = city_id;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        self.raise(LifecycleKind::Patched);
    }

    pub fn disable(&mut self) {
        self.is_enabled = false;
        self.raise(LifecycleKind::Disabled);
    }

    pub fn activate(&mut self) {
        self.is_enabled = true;
        self.raise(LifecycleKind::Activated);
    }

    pub fn city_id(&self) -> CityId {
        self.city_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for Sector {
    type Id = SectorId;

    fn id(&self) -> &SectorId {
        &self.id
    }
}

impl Referential for Sector {
    const KIND: &'static str = "geography.sector";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Sector {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for sector queries.
#[derive(Debug, Clone)]
pub struct SectorFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub city_id: Option<CityId>,
    pub enabled: Option<bool>,
}

impl Default for SectorFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            city_id: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Sector {
    type Filter = SectorFilter;

    fn matches(&self, f: &SectorFilter) -> bool {
        f.code
            .as_deref()
            .map_or(true, |c| self.code.eq_ignore_ascii_case(c))
            && f.name
                .as_deref()
                .map_or(true, |n| self.name.to_lowercase().contains(&n.to_lowercase()))
            && f.city_id.map_or(true, |c| self.city_id == c)
            && f.enabled.map_or(true, |e| self.is_enabled == e)
    }

    fn natural_key(&self) -> String {
        self.code.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_filter_matches_only_that_city() {
        let city = CityId::new(EntityId::new());
        let other = CityId::new(EntityId::new());
        let sector = Sector::create(SectorId::new(EntityId::new()), city, "S01".into(), "Maarif".into());
        assert!(sector.matches(&SectorFilter {
            city_id: Some(city),
            ..SectorFilter::default()
        }));
        assert!(!sector.matches(&SectorFilter {
            city_id: Some(other),
            ..SectorFilter::default()
        }));
    }

    #[test]
    fn activate_restores_a_disabled_sector() {
        let mut sector = Sector::create(
            SectorId::new(EntityId::new()),
            CityId::new(EntityId::new()),
            "S01".into(),
            "Maarif".into(),
        );
        sector.disable();
        assert!(!sector.is_enabled());
        sector.activate();
        assert!(sector.is_enabled());
        assert_eq!(sector.pending_events().last().unwrap().event_type(), "geography.sector.activated");
    }
}
