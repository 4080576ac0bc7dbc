use serde::{Deserialize, Serialize};

use refdata_core::{Entity, EntityId, Referential};
use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
use refdata_store::MasterRecord;

/// Tax identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(pub EntityId);

impl TaxId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for TaxId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Tax.
///
/// Carries bilingual display codes next to the technical code; the rate is
/// kept in basis points to stay off floating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    id: TaxId,
    code: String,
    code_en: String,
    code_ar: String,
    description: Option<String>,
    rate_bps: u32,
    is_enabled: bool,
    #[serde(skip, default)]
    events: EventLog,
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TaxPatch {
    pub code: Option<String>,
    pub code_en: Option<String>,
    pub code_ar: Option<String>,
    pub description: Option<Option<String>>,
    pub rate_bps: Option<u32>,
}

impl Tax {
    pub fn create(
        id: TaxId,
        code: String,
        code_en: String,
        code_ar: String,
        description: Option<String>,
        rate_bps: u32,
    ) -> Self {
        let mut tax = Self {
            id,
            code,
            code_en,
            code_ar,
            description,
            rate_bps,
            is_enabled: true,
            events: EventLog::new(),
        };
        tax.raise(LifecycleKind::Created);
        tax
    }

    pub fn update(
        &mut self,
        code: String,
        code_en: String,
        code_ar: String,
        description: Option<String>,
        rate_bps: u32,
    ) {
        self.code = code;
        self.code_en = code_en;
        self.code_ar = code_ar;
        self.description = description;
        self.rate_bps = rate_bps;
        self.raise(LifecycleKind::Updated);
    }

    pub fn patch(&mut self, patch: TaxPatch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(code_en) = patch.code_en {
            self.code_en = code_en;
        }
        if let Some(code_ar) = patch.code_ar {
            self.code_ar = code_ar;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(rate_bps) = patch.rate_bps {
            self.rate_bps = rate_bps;
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

    pub fn code_en(&self) -> &str {
        &self.code_en
    }

    pub fn code_ar(&self) -> &str {
        &self.code_ar
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn rate_bps(&self) -> u32 {
        self.rate_bps
    }

    fn raise(&mut self, kind: LifecycleKind) {
        let state = serde_json::to_value(&*self).unwrap_or(serde_json::Value::Null);
        self.events
            .record(LifecycleEvent::new(Self::KIND, *self.id.0.as_uuid(), kind, state));
    }
}

impl Entity for Tax {
    type Id = TaxId;

    fn id(&self) -> &TaxId {
        &self.id
    }
}

impl Referential for Tax {
    const KIND: &'static str = "finance.tax";

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl HasEvents for Tax {
    fn pending_events(&self) -> &[LifecycleEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }
}

/// Conjunctive filter criteria for tax queries.
#[derive(Debug, Clone)]
pub struct TaxFilter {
    pub code: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

impl Default for TaxFilter {
    fn default() -> Self {
        Self {
            code: None,
            description: None,
            enabled: Some(true),
        }
    }
}

impl MasterRecord for Tax {
    type Filter = TaxFilter;

    fn matches(&self, f: &TaxFilter) -> bool {
        f.code
            .as_deref()
            .map_or(true, |c| self.code.eq_ignore_ascii_case(c))
            && f.description.as_deref().map_or(true, |d| {
                self.description
                    .as_deref()
                    .map_or(false, |own| own.to_lowercase().contains(&d.to_lowercase()))
            })
            && f.enabled.map_or(true, |e| self.is_enabled == e)
    }

    fn natural_key(&self) -> String {
        self.code.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vat() -> Tax {
        Tax::create(
            TaxId::new(EntityId::new()),
            "VAT20".into(),
            "VAT".into(),
            "ض.ق.م".into(),
            Some("Standard value-added tax".into()),
            2000,
        )
    }

    #[test]
    fn patching_only_the_code_leaves_the_other_fields_untouched() {
        let mut tax = vat();
        tax.patch(TaxPatch {
            code: Some("VAT-STD".into()),
            ..TaxPatch::default()
        });
        assert_eq!(tax.code(), "VAT-STD");
        assert_eq!(tax.code_en(), "VAT");
        assert_eq!(tax.code_ar(), "ض.ق.م");
        assert_eq!(tax.description(), Some("Standard value-added tax"));
        assert_eq!(tax.rate_bps(), 2000);
    }

    #[test]
    fn description_patch_distinguishes_clear_from_keep() {
        let mut tax = vat();
        tax.patch(TaxPatch {
            rate_bps: Some(1000),
            ..TaxPatch::default()
        });
        assert!(tax.description().is_some());

        tax.patch(TaxPatch {
            description: Some(None),
            ..TaxPatch::default()
        });
        assert_eq!(tax.description(), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Patch law: every unsupplied field equals its pre-patch value,
            /// every supplied field equals the supplied value.
            #[test]
            fn patch_preserves_unset_fields(
                code in "[A-Z]{2,8}",
                code_en in "[A-Za-z ]{1,20}",
                new_code in proptest::option::of("[A-Z]{2,8}"),
                new_rate in proptest::option::of(0u32..10_000),
            ) {
                let mut tax = Tax::create(
                    TaxId::new(EntityId::new()),
                    code.clone(),
                    code_en.clone(),
                    "ر".to_string(),
                    None,
                    500,
                );

                tax.patch(TaxPatch {
                    code: new_code.clone(),
                    rate_bps: new_rate,
                    ..TaxPatch::default()
                });

                prop_assert_eq!(tax.code(), new_code.as_deref().unwrap_or(&code));
                prop_assert_eq!(tax.rate_bps(), new_rate.unwrap_or(500));
                // untouched fields
                prop_assert_eq!(tax.code_en(), code_en.as_str());
                prop_assert_eq!(tax.code_ar(), "ر");
                prop_assert_eq!(tax.description(), None);
            }
        }
    }
}
