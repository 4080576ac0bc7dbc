//! Lifecycle event record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to a record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleKind {
    Created,
    Updated,
    Patched,
    Disabled,
    Activated,
}

impl LifecycleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleKind::Created => "created",
            LifecycleKind::Updated => "updated",
            LifecycleKind::Patched => "patched",
            LifecycleKind::Disabled => "disabled",
            LifecycleKind::Activated => "activated",
        }
    }
}

/// An immutable record of one lifecycle transition.
///
/// Carries the **post-change** field values (a snapshot, not a diff) so audit
/// consumers never have to reconstruct state. Events are:
/// - **immutable** (treat them as facts)
/// - **append-only** (buffered on the aggregate, drained at commit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    event_id: Uuid,
    aggregate_type: String,
    aggregate_id: Uuid,
    kind: LifecycleKind,
    state: serde_json::Value,
    occurred_at: DateTime<Utc>,
}

impl LifecycleEvent {
    pub fn new(
        aggregate_type: &'static str,
        aggregate_id: Uuid,
        kind: LifecycleKind,
        state: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            aggregate_type: aggregate_type.to_string(),
            aggregate_id,
            kind,
            state,
            occurred_at: Utc::now(),
        }
    }

    /// Stable event name, e.g. `"geography.city.disabled"`.
    pub fn event_type(&self) -> String {
        format!("{}.{}", self.aggregate_type, self.kind.as_str())
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }

    pub fn kind(&self) -> LifecycleKind {
        self.kind
    }

    /// Post-change field values.
    pub fn state(&self) -> &serde_json::Value {
        &self.state
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_combines_kind_and_aggregate_type() {
        let ev = LifecycleEvent::new(
            "finance.bank",
            Uuid::now_v7(),
            LifecycleKind::Created,
            serde_json::json!({"code": "AWB"}),
        );
        assert_eq!(ev.event_type(), "finance.bank.created");
    }
}
