use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Product (a sellable offering; services hang off it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    code: String,
    name: String,
    description: Option<String>,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl Product {
    pub fn create(id: ProductId, code: String, name: String, description: Option<String>) -> Self {
        let mut product = Self {
            id,
            code,
            name,
            description,
            is_enabled: true,
            events: EventLog::new(),
        };
        product.raise(LifecycleKind::Created);
        product
    }

    pub fn update(&mut self, code: String, name: String, description: Option<String>) {
        self.code = code;
        self.name = name;
        self.description = description;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: ProductPatch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
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

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

impl Referential for Product {
    const KIND: &'static str = "catalog.product";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Product {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for product queries.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Product {
    type Filter = ProductFilter;

    fn matches(&self, f: &ProductFilter) -> bool {
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
    fn lifecycle_events_accumulate_until_drained() {
        let mut product = Product::create(
            ProductId::new(EntityId::new()),
            "TRF".into(),
            "Cash transfer".into(),
            None,
        );
        product.update("TRF".into(), "Cash transfer national".into(), None);
        product.disable();
        assert_eq!(product.pending_events().len(), 3);

        let drained = product.take_events();
        assert_eq!(drained.len(), 3);
        assert!(product.pending_events().is_empty());
        assert_eq!(drained[2].event_type(), "catalog.product.disabled");
    }
}
