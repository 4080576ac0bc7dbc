use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

/// Partner identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartnerId(pub EntityId);

impl PartnerId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PartnerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Partner (an external payout/collection counterparty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    id: PartnerId,
    code: String,
    name: String,
    contact_email: Option<String>,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct PartnerPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub contact_email: Option<Option<String>>,
}

impl Partner {
    pub fn create(id: PartnerId, code: String, name: String, contact_email: Option<String>) -> Self {
        let mut partner = Self {
            id,
            code,
            name,
            contact_email,
            is_enabled: true,
            events: EventLog::new(),
        };
        partner.raise(LifecycleKind::Created);
        partner
    }

    pub fn update(&mut self, code: String, name: String, contact_email: Option<String>) {
        self.code = code;
        self.name = name;
        self.contact_email = contact_email;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: PartnerPatch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(contact_email) = patch.contact_email {
            self.contact_email = contact_email;
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

    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email.as_deref()
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for Partner {
    type Id = PartnerId;

    fn id(&self) -> &PartnerId {
        &self.id
    }
}

impl Referential for Partner {
    const KIND: &'static str = "network.partner";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Partner {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for partner queries.
#[derive(Debug, Clone)]
pub struct PartnerFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

impl Default for PartnerFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Partner {
    type Filter = PartnerFilter;

    fn matches(&self, f: &PartnerFilter) -> bool {
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

    #[test]
    fn soft_delete_keeps_the_record_readable() {
        let mut partner = Partner::create(
            PartnerId::new(EntityId::new()),
            "WU".into(),
            "Western Union".into(),
            None,
        );
        partner.disable();
        assert!(!partner.is_enabled());
        assert_eq!(partner.code(), "WU");
    }
}
