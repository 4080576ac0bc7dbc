use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

/// Currency identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyId(pub EntityId);

impl CurrencyId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Currency. `decimals` is the minor-unit exponent (2 for
/// MAD/EUR, 0 for JPY).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    id: CurrencyId,
    code: String,
    name: String,
    decimals: u8,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct CurrencyPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u8>,
}

impl Currency {
    pub fn create(id: CurrencyId, code: String, name: String, decimals: u8) -> Self {
        let mut currency = Self {
            id,
            code,
            name,
            decimals,
            is_enabled: true,
            events: EventLog::new(),
        };
        currency.raise(LifecycleKind::Created);
        currency
    }

    pub fn update(&mut self, code: String, name: String, decimals: u8) {
        self.code = code;
        self.name = name;
        self.decimals = decimals;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: CurrencyPatch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(decimals) = patch.decimals {
            self.decimals = decimals;
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

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for Currency {
    type Id = CurrencyId;

    fn id(&self) -> &CurrencyId {
        &self.id
    }
}

impl Referential for Currency {
    const KIND: &'static str = "finance.currency";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Currency {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for currency queries.
#[derive(Debug, Clone)]
pub struct CurrencyFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

impl Default for CurrencyFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Currency {
    type Filter = CurrencyFilter;

    fn matches(&self, f: &CurrencyFilter) -> bool {
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
    fn create_defaults_to_enabled() {
        let mad = Currency::create(CurrencyId::new(EntityId::new()), "MAD".into(), "Moroccan Dirham".into(), 2);
        assert!(mad.is_enabled());
        assert_eq!(mad.decimals(), 2);
    }
}
