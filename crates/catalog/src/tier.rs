use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Money, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

/// Tier identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(pub EntityId);

impl TierId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for TierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Tier (an amount bracket used for commissions).
///
/// The floor/ceiling bounds are `Money` value objects; bound validation
/// (floor ≤ ceiling, same currency) is part of command validation, not
/// re-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    id: TierId,
    code: String,
    name: String,
    floor: Money,
    ceiling: Money,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TierPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub floor: Option<Money>,
    pub ceiling: Option<Money>,
}

impl Tier {
    pub fn create(id: TierId, code: String, name: String, floor: Money, ceiling: Money) -> Self {
        let mut tier = Self {
            id,
            code,
            name,
            floor,
            ceiling,
            is_enabled: true,
            events: EventLog::new(),
        };
        tier.raise(LifecycleKind::Created);
        tier
    }

    pub fn update(&mut self, code: String, name: String, floor: Money, ceiling: Money) {
        self.code = code;
        self.name = name;
        self.floor = floor;
        self.ceiling = ceiling;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: TierPatch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(floor) = patch.floor {
            self.floor = floor;
        }
        if let Some(ceiling) = patch.ceiling {
            self.ceiling = ceiling;
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

    pub fn floor(&self) -> &Money {
        &self.floor
    }

    pub fn ceiling(&self) -> &Money {
        &self.ceiling
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for Tier {
    type Id = TierId;

    fn id(&self) -> &TierId {
        &self.id
    }
}

impl Referential for Tier {
    const KIND: &'static str = "catalog.tier";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Tier {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for tier queries.
#[derive(Debug, Clone)]
pub struct TierFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

impl Default for TierFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Tier {
    type Filter = TierFilter;

    fn matches(&self, f: &TierFilter) -> bool {
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

    fn bracket() -> Tier {
        Tier::create(
            TierId::new(EntityId::new()),
            "T1".into(),
            "0-1000 MAD".into(),
            Money::zero("MAD").unwrap(),
            Money::new(100_000, "MAD").unwrap(),
        )
    }

    #[test]
    fn patching_one_bound_keeps_the_other() {
        let mut tier = bracket();
        tier.patch(TierPatch {
            ceiling: Some(Money::new(200_000, "MAD").unwrap()),
            ..TierPatch::default()
        });
        assert_eq!(tier.floor().amount_minor(), 0);
        assert_eq!(tier.ceiling().amount_minor(), 200_000);
    }
}
