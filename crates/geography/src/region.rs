use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

/// Region identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub EntityId);

impl RegionId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for RegionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    id: RegionId,
    code: String,
    name: String,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct RegionPatch {
    pub code: Option<String>,
    pub name: Option<String>,
}

impl Region {
    /// Precondition: the caller has already run the uniqueness check.
    pub fn create(id: RegionId, code: String, name: String) -> Self {
        let mut region = Self {
            id,
            code,
            name,
            is_enabled: true,
            events: EventLog::new(),
        };
        region.raise(LifecycleKind::Created);
        region
    }

    /// Full replace of every mutable field.
    pub fn update(&mut self, code: String, name: String) {
        self.code = code;
        self.name = name;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: RegionPatch) {
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

impl Entity for Region {
    type Id = RegionId;

    fn id(&self) -> &RegionId {
        &self.id
    }
}

impl Referential for Region {
    const KIND: &'static str = "geography.region";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Region {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for region queries.
#[derive(Debug, Clone)]
pub struct RegionFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

impl Default for RegionFilter {
    /// Disabled records stay hidden unless explicitly requested.
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Region {
    type Filter = RegionFilter;

    fn matches(&self, f: &RegionFilter) -> bool {
        f.code
            .as_deref()
            .map_or(true, |c| self.code.eq_ignore_ascii_case(c))
            && f.name
                .as_deref()
                .map_or(true, |n| self.name.to_lowercase().contains(&n.to_lowercase()))
            && f.enabled.map_or(true, |e| self.is_enabled == e)
    }

    fn natural_key(&self) -> String {
        self.code.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_id() -> RegionId {
        RegionId::new(EntityId::new())
    }

    #[test]
    fn create_starts_enabled_and_raises_created() {
        let region = Region::create(region_id(), "R05".into(), "Casablanca-Settat".into());
        assert!(region.is_enabled());
        assert_eq!(region.pending_events().len(), 1);
        assert_eq!(region.pending_events()[0].event_type(), "geography.region.created");
    }

    #[test]
    fn patch_with_no_fields_changes_nothing_but_still_records() {
        let mut region = Region::create(region_id(), "R05".into(), "Casablanca-Settat".into());
        region.patch(RegionPatch::default());
        assert_eq!(region.code(), "R05");
        assert_eq!(region.name(), "Casablanca-Settat");
        assert_eq!(region.pending_events().len(), 2);
    }

    #[test]
    fn disable_is_idempotent_in_outcome_but_re_raises() {
        let mut region = Region::create(region_id(), "R05".into(), "Casablanca-Settat".into());
        region.disable();
        region.disable();
        assert!(!region.is_enabled());
        // created + disabled + disabled
        assert_eq!(region.pending_events().len(), 3);
    }

    #[test]
    fn default_filter_hides_disabled_records() {
        let mut region = Region::create(region_id(), "R05".into(), "Casablanca-Settat".into());
        assert!(region.matches(&RegionFilter::default()));
        region.disable();
        assert!(!region.matches(&RegionFilter::default()));
        assert!(region.matches(&RegionFilter {
            enabled: Some(false),
            ..RegionFilter::default()
        }));
    }
}
