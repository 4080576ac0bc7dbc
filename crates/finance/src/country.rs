use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

use crate::currency::CurrencyId;

/// Country identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryId(pub EntityId);

impl CountryId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CountryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Country. References its legal-tender currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    id: CountryId,
    currency_id: CurrencyId,
    code: String,
    name: String,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct CountryPatch {
    pub currency_id: Option<CurrencyId>,
    pub code: Option<String>,
    pub name: Option<String>,
}

impl Country {
    pub fn create(id: CountryId, currency_id: CurrencyId, code: String, name: String) -> Self {
        let mut country = Self {
            id,
            currency_id,
            code,
            name,
            is_enabled: true,
            events: EventLog::new(),
        };
        country.raise(LifecycleKind::Created);
        country
    }

    pub fn update(&mut self, currency_id: CurrencyId, code: String, name: String) {
        self.currency_id = currency_id;
        self.code = code;
        self.name = name;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: CountryPatch) {
        if let Some(currency_id) = patch.currency_id {
            self.currency_id = currency_id;
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

    pub fn currency_id(&self) -> CurrencyId {
        self.currency_id
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

impl Entity for Country {
    type Id = CountryId;

    fn id(&self) -> &CountryId {
        &self.id
    }
}

impl Referential for Country {
    const KIND: &'static str = "finance.country";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Country {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for country queries.
#[derive(Debug, Clone)]
pub struct CountryFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub currency_id: Option<CurrencyId>,
    pub enabled: Option<bool>,
}

impl Default for CountryFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            currency_id: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Country {
    type Filter = CountryFilter;

    fn matches(&self, f: &CountryFilter) -> bool {
        f.code
            .as_deref()
            .map_or(true, |c| self.code.eq_ignore_ascii_case(c))
            && f.name
                .as_deref()
                .map_or(true, |n| self.name.to_lowercase().contains(&n.to_lowercase()))
            && f.currency_id.map_or(true, |c| self.currency_id == c)
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
    fn patch_can_repoint_the_currency_reference() {
        let eur = CurrencyId::new(EntityId::new());
        let mad = CurrencyId::new(EntityId::new());
        let mut morocco = Country::create(CountryId::new(EntityId::new()), eur, "MA".into(), "Morocco".into());
        morocco.patch(CountryPatch {
            currency_id: Some(mad),
            ..CountryPatch::default()
        });
        assert_eq!(morocco.currency_id(), mad);
        assert_eq!(morocco.code(), "MA");
    }
}
