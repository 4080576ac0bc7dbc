use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

/// Bank identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankId(pub EntityId);

impl BankId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for BankId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    id: BankId,
    code: String,
    name: String,
    swift: Option<String>,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct BankPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub swift: Option<Option<String>>,
}

impl Bank {
    /// Precondition: the caller has already run the code-uniqueness check.
    pub fn create(id: BankId, code: String, name: String, swift: Option<String>) -> Self {
        let mut bank = Self {
            id,
            code,
            name,
            swift,
            is_enabled: true,
            events: EventLog::new(),
        };
        bank.raise(LifecycleKind::Created);
        bank
    }

    pub fn update(&mut self, code: String, name: String, swift: Option<String>) {
        self.code = code;
        self.name = name;
        self.swift = swift;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: BankPatch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(swift) = patch.swift {
            self.swift = swift;
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

    pub fn swift(&self) -> Option<&str> {
        self.swift.as_deref()
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for Bank {
    type Id = BankId;

    fn id(&self) -> &BankId {
        &self.id
    }
}

impl Referential for Bank {
    const KIND: &'static str = "finance.bank";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Bank {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for bank queries.
#[derive(Debug, Clone)]
pub struct BankFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

impl Default for BankFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Bank {
    type Filter = BankFilter;

    fn matches(&self, f: &BankFilter) -> bool {
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
    fn swift_patch_distinguishes_clear_from_keep() {
        let mut bank = Bank::create(
            BankId::new(EntityId::new()),
            "AWB".into(),
            "Attijariwafa Bank".into(),
            Some("BCMAMAMC".into()),
        );

        // None = keep
        bank.patch(BankPatch {
            name: Some("Attijariwafa".into()),
            ..BankPatch::default()
        });
        assert_eq!(bank.swift(), Some("BCMAMAMC"));

        // Some(None) = clear
        bank.patch(BankPatch {
            swift: Some(None),
            ..BankPatch::default()
        });
        assert_eq!(bank.swift(), None);
    }

    #[test]
    fn natural_key_is_case_folded_code() {
        let bank = Bank::create(BankId::new(EntityId::new()), "awb".into(), "AWB".into(), None);
        assert_eq!(bank.natural_key(), "AWB");
    }
}
