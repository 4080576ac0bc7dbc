use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_geography::CityId;
use refdata_store::MasterRecord;

/// Agency identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgencyId(pub EntityId);

impl AgencyId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AgencyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Agency (a branch located in a city).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    id: AgencyId,
    city_id: CityId,
    code: String,
    name: String,
    address: Option<String>,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct AgencyPatch {
    pub city_id: Option<CityId>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub address: Option<Option<String>>,
}

impl Agency {
    /// Precondition: the caller has already checked code uniqueness and that
    /// the city exists.
    pub fn create(
        id: AgencyId,
        city_id: CityId,
        code: String,
        name: String,
        address: Option<String>,
    ) -> Self {
        let mut agency = Self {
            id,
            city_id,
            code,
            name,
            address,
            is_enabled: true,
            events: EventLog::new(),
        };
        agency.raise(LifecycleKind::Created);
        agency
    }

    pub fn update(&mut self, city_id: CityId, code: String, name: String, address: Option<String>) {
        self.city_id = city_id;
        self.code = code;
        self.name = name;
        self.address = address;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: AgencyPatch) {
        if let Some(city_id) = patch.city_id {
            self.city_id = city_id;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
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

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for Agency {
    type Id = AgencyId;

    fn id(&self) -> &AgencyId {
        &self.id
    }
}

impl Referential for Agency {
    const KIND: &'static str = "network.agency";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Agency {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for agency queries.
#[derive(Debug, Clone)]
pub struct AgencyFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub city_id: Option<CityId>,
    pub enabled: Option<bool>,
}

impl Default for AgencyFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            city_id: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Agency {
    type Filter = AgencyFilter;

    fn matches(&self, f: &AgencyFilter) -> bool {
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
    fn disabled_agency_no_longer_counts_as_a_live_city_reference() {
        let city = CityId::new(EntityId::new());
        let mut agency = Agency::create(
            AgencyId::new(EntityId::new()),
            city,
            "AG-001".into(),
            "Agence Anfa".into(),
            None,
        );
        let live = AgencyFilter {
            city_id: Some(city),
            ..AgencyFilter::default()
        };
        assert!(agency.matches(&live));
        agency.disable();
        assert!(!agency.matches(&live));
    }
}
