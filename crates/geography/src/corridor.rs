use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

use crate::city::CityId;

/// Corridor identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorridorId(pub EntityId);

impl CorridorId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CorridorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Corridor (a remittance corridor anchored on a city).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    id: CorridorId,
    city_id: CityId,
    code: String,
    name: String,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct CorridorPatch {
    pub city_id: Option<CityId>,
    pub code: Option<String>,
    pub name: Option<String>,
}

impl Corridor {
    pub fn create(id: CorridorId, city_id: CityId, code: String, name: String) -> Self {
        let mut corridor = Self {
            id,
            city_id,
            code,
            name,
            is_enabled: true,
            events: EventLog::new(),
        };
        corridor.raise(LifecycleKind::Created);
        corridor
    }

    pub fn update(&mut self, city_id: CityId, code: String, name: String) {
        self.city_id = city_id;
        self.code = code;
        self.name = name;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: CorridorPatch) {
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

impl Entity for Corridor {
    type Id = CorridorId;

    fn id(&self) -> &CorridorId {
        &self.id
    }
}

impl Referential for Corridor {
    const KIND: &'static str = "geography.corridor";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Corridor {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for corridor queries.
#[derive(Debug, Clone)]
pub struct CorridorFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub city_id: Option<CityId>,
    pub enabled: Option<bool>,
}

impl Default for CorridorFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            city_id: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Corridor {
    type Filter = CorridorFilter;

    fn matches(&self, f: &CorridorFilter) -> bool {
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
    fn update_raises_updated_with_the_new_state() {
        let mut corridor = Corridor::create(
            CorridorId::new(EntityId::new()),
            CityId::new(EntityId::new()),
            "COR-01".into(),
            "Casablanca-Paris".into(),
        );
        let city = CityId::new(EntityId::new());
        corridor.update(city, "COR-02".into(), "Casablanca-Madrid".into());
        let ev = corridor.pending_events().last().unwrap();
        assert_eq!(ev.event_type(), "geography.corridor.updated");
        assert_eq!(ev.state()["code"], "COR-02");
    }
}
