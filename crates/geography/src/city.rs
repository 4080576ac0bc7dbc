use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

use crate::region::RegionId;

/// City identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub EntityId);

impl CityId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: City.
///
/// Holds a typed reference to its region; agencies, sectors and corridors
/// hold typed references back to the city, which is why disabling a city is
/// guarded in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    id: CityId,
    region_id: RegionId,
    code: String,
    name: String,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct CityPatch {
    pub region_id: Option<RegionId>,
    pub code: Option<String>,
    pub name: Option<String>,
}

impl City {
    /// Precondition: the caller has already checked code uniqueness and that
    /// the region exists.
    pub fn create(id: CityId, region_id: RegionId, code: String, name: String) -> Self {
        let mut city = Self {
            id,
            region_id,
            code,
            name,
            is_enabled: true,
            events: EventLog::new(),
        };
        city.raise(LifecycleKind::Created);
        city
    }

    /// Full replace of every mutable field. No field is defaulted from the
    /// current state.
    pub fn update(&mut self, region_id: RegionId, code: String, name: String) {
        self.region_id = region_id;
        self.code = code;
        self.name = name;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: CityPatch) {
        if let Some(region_id) = patch.region_id {
            self.region_id = region_id;
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

    pub fn region_id(&self) -> RegionId {
        self.region_id
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

impl Entity for City {
    type Id = CityId;

    fn id(&self) -> &CityId {
        &self.id
    }
}

impl Referential for City {
    const KIND: &'static str = "geography.city";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for City {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for city queries.
#[derive(Debug, Clone)]
pub struct CityFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub region_id: Option<RegionId>,
    pub enabled: Option<bool>,
}

impl Default for CityFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            region_id: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for City {
    type Filter = CityFilter;

    fn matches(&self, f: &CityFilter) -> bool {
        f.code
            .as_deref()
            .map_or(true, |c| self.code.eq_ignore_ascii_case(c))
            && f.name
                .as_deref()
                .map_or(true, |n| self.name.to_lowercase().contains(&n.to_lowercase()))
            && f.region_id.map_or(true, |r| self.region_id == r)
            && f.enabled.map_or(true, |e| self.is_enabled == e)
    }

    fn natural_key(&self) -> String {
        self.code.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn casablanca() -> City {
        City::create(
            CityId::new(EntityId::new()),
            RegionId::new(EntityId::new()),
            "CAS".into(),
            "Casablanca".into(),
        )
    }

    #[test]
    fn update_replaces_every_mutable_field() {
        let mut city = casablanca();
        let new_region = RegionId::new(EntityId::new());
        city.update(new_region, "CASA".into(), "Grand Casablanca".into());
        assert_eq!(city.region_id(), new_region);
        assert_eq!(city.code(), "CASA");
        assert_eq!(city.name(), "Grand Casablanca");
        assert_eq!(city.pending_events().last().unwrap().event_type(), "geography.city.updated");
    }

    #[test]
    fn patch_keeps_unsupplied_fields() {
        let mut city = casablanca();
        let region_before = city.region_id();
        city.patch(CityPatch {
            name: Some("Casablanca-Anfa".into()),
            ..CityPatch::default()
        });
        assert_eq!(city.code(), "CAS");
        assert_eq!(city.region_id(), region_before);
        assert_eq!(city.name(), "Casablanca-Anfa");
    }

    #[test]
    fn patched_event_carries_the_post_merge_state() {
        let mut city = casablanca();
        city.patch(CityPatch {
            name: Some("Casablanca-Anfa".into()),
            ..CityPatch::default()
        });
        let ev = city.pending_events().last().unwrap();
        assert_eq!(ev.state()["name"], "Casablanca-Anfa");
        assert_eq!(ev.state()["code"], "CAS");
    }

    #[test]
    fn code_filter_is_case_insensitive_exact_match() {
        let city = casablanca();
        assert!(city.matches(&CityFilter {
            code: Some("cas".into()),
            ..CityFilter::default()
        }));
        assert!(!city.matches(&CityFilter {
            code: Some("CA".into()),
            ..CityFilter::default()
        }));
    }

    #[test]
    fn name_filter_is_substring_match() {
        let city = casablanca();
        assert!(city.matches(&CityFilter {
            name: Some("sabla".into()),
            ..CityFilter::default()
        }));
    }
}
