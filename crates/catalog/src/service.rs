use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

use crate::product::ProductId;

/// Service identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub EntityId);

impl ServiceId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Service (a concrete variant of a product).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    id: ServiceId,
    product_id: ProductId,
    code: String,
    name: String,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub product_id: Option<ProductId>,
    pub code: Option<String>,
    pub name: Option<String>,
}

impl Service {
    pub fn create(id: ServiceId, product_id: ProductId, code: String, name: String) -> Self {
        let mut service = Self {
            id,
            product_id,
            code,
            name,
            is_enabled: true,
            events: EventLog::new(),
        };
        service.raise(LifecycleKind::Created);
        service
    }

    pub fn update(&mut self, product_id: ProductId, code: String, name: String) {
        self.product_id = product_id;
        self.code = code;
        self.name = name;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: ServicePatch) {
        if let Some(product_id) = patch.product_id {
            self.product_id = product_id;
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

    pub fn product_id(&self) -> ProductId {
        self.product_id
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

impl Entity for Service {
    type Id = ServiceId;

    fn id(&self) -> &ServiceId {
        &self.id
    }
}

impl Referential for Service {
    const KIND: &'static str = "catalog.service";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Service {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for service queries.
#[derive(Debug, Clone)]
pub struct ServiceFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub product_id: Option<ProductId>,
    pub enabled: Option<bool>,
}

impl Default for ServiceFilter {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            product_id: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Service {
    type Filter = ServiceFilter;

    fn matches(&self, f: &ServiceFilter) -> bool {
        f.code
            .as_deref()
            .map_or(true, |c| self.code.eq_ignore_ascii_case(c))
            && f.name
                .as_deref()
                .map_or(true, |n| self.name.to_lowercase().contains(&n.to_lowercase()))
            && f.product_id.map_or(true, |p| self.product_id == p)
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
    fn service_keeps_a_typed_product_reference() {
        let product = ProductId::new(EntityId::new());
        let service = Service::create(
            ServiceId::new(EntityId::new()),
            product,
            "TRF-EXP".into(),
            "Express transfer".into(),
        );
        assert_eq!(service.product_id(), product);
        assert!(service.matches(&ServiceFilter {
            product_id: Some(product),
            ..ServiceFilter::default()
        }));
    }
}
