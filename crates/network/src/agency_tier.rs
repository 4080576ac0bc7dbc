use serde::{Deserialize, Serialize};

use refdata_catalog::TierId;
use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

use crate::agency::AgencyId;

/// AgencyTier identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgencyTierId(pub EntityId);

impl AgencyTierId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AgencyTierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: AgencyTier — a commission bracket assigned to one agency.
///
/// The natural key is composite: the same `code` may exist for different
/// (agency, tier) pairs, but never twice under the same pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyTier {
    id: AgencyTierId,
    agency_id: AgencyId,
    tier_id: TierId,
    code: String,
    commission_bps: u32,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct AgencyTierPatch {
    pub agency_id: Option<AgencyId>,
    pub tier_id: Option<TierId>,
    pub code: Option<String>,
    pub commission_bps: Option<u32>,
}

impl AgencyTier {
    pub fn create(
        id: AgencyTierId,
        agency_id: AgencyId,
        tier_id: TierId,
        code: String,
        commission_bps: u32,
    ) -> Self {
        let mut link = Self {
            id,
            agency_id,
            tier_id,
            code,
            commission_bps,
            is_enabled: true,
            events: EventLog::new(),
        };
        link.raise(LifecycleKind::Created);
        link
    }

    pub fn update(
        &mut self,
        agency_id: AgencyId,
        tier_id: TierId,
        code: String,
        commission_bps: u32,
    ) {
        self.agency_id = agency_id;
        self.tier_id = tier_id;
        self.code = code;
        self.commission_bps = commission_bps;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: AgencyTierPatch) {
        if let Some(agency_id) = patch.agency_id {
            self.agency_id = agency_id;
        }
        if let Some(tier_id) = patch.tier_id {
            self.tier_id = tier_id;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(commission_bps) = patch.commission_bps {
            self.commission_bps = commission_bps;
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

    pub fn agency_id(&self) -> AgencyId {
        self.agency_id
    }

    pub fn tier_id(&self) -> TierId {
        self.tier_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn commission_bps(&self) -> u32 {
        self.commission_bps
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for AgencyTier {
    type Id = AgencyTierId;

    fn id(&self) -> &AgencyTierId {
        &self.id
    }
}

impl Referential for AgencyTier {
    const KIND: &'static str = "network.agency_tier";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for AgencyTier {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for agency-tier queries.
#[derive(Debug, Clone)]
pub struct AgencyTierFilter {
    pub code: Option<String>,
    pub agency_id: Option<AgencyId>,
    pub tier_id: Option<TierId>,
    pub enabled: Option<bool>,
}

impl Default for AgencyTierFilter {
    fn default() -> Self {
        Self {
            code: None,
            agency_id: None,
            tier_id: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for AgencyTier {
    type Filter = AgencyTierFilter;

    fn matches(&self, f: &AgencyTierFilter) -> bool {
        f.code
            .as_deref()
            .map_or(true, |c| self.code.eq_ignore_ascii_case(c))
            && f.agency_id.map_or(true, |a| self.agency_id == a)
            && f.tier_id.map_or(true, |t| self.tier_id == t)
            && f.enabled.map_or(true, |e| self.is_enabled == e)
    }

    /// Composite key: (agency, tier, code).
    fn natural_key(&self) -> String {
        format!("{}:{}:{}", self.agency_id, self.tier_id, self.code.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_code_under_different_pairs_has_distinct_natural_keys() {
        let tier = TierId::new(EntityId::new());
        let a = AgencyTier::create(
            AgencyTierId::new(EntityId::new()),
            AgencyId::new(EntityId::new()),
            tier,
            "STD".into(),
            150,
        );
        let b = AgencyTier::create(
            AgencyTierId::new(EntityId::new()),
            AgencyId::new(EntityId::new()),
            tier,
            "STD".into(),
            150,
        );
        assert_ne!(a.natural_key(), b.natural_key());
    }

    #[test]
    fn same_pair_and_code_collide_regardless_of_case() {
        let agency = AgencyId::new(EntityId::new());
        let tier = TierId::new(EntityId::new());
        let a = AgencyTier::create(AgencyTierId::new(EntityId::new()), agency, tier, "std".into(), 150);
        let b = AgencyTier::create(AgencyTierId::new(EntityId::new()), agency, tier, "STD".into(), 200);
        assert_eq!(a.natural_key(), b.natural_key());
    }
}
