//! Strongly-typed identifiers used across the referential.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a referential record.
///
/// Entity crates wrap this in their own newtype (`CityId`, `BankId`, ...) so a
/// city id cannot be passed where a bank id is expected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Mint a fresh identifier.
    ///
    /// Uses UUIDv7 (time-ordered), so storage iteration order follows creation
    /// order. Prefer passing ids explicitly in tests for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID. The nil value is never a valid identity.
    pub fn of(raw: Uuid) -> Result<Self, DomainError> {
        if raw.is_nil() {
            return Err(DomainError::invalid_id("nil identifier"));
        }
        Ok(Self(raw))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<EntityId> for Uuid {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("EntityId: {e}")))?;
        Self::of(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_rejects_nil_uuid() {
        let err = EntityId::of(Uuid::nil()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn of_accepts_non_nil_uuid() {
        let raw = Uuid::now_v7();
        let id = EntityId::of(raw).unwrap();
        assert_eq!(id.as_uuid(), &raw);
    }

    #[test]
    fn equality_is_value_based() {
        let raw = Uuid::now_v7();
        assert_eq!(EntityId::of(raw).unwrap(), EntityId::of(raw).unwrap());
        assert_ne!(EntityId::new(), EntityId::new());
    }

    #[test]
    fn parse_round_trips_through_display() {
        let id = EntityId::new();
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_nil_and_garbage() {
        assert!("00000000-0000-0000-0000-000000000000".parse::<EntityId>().is_err());
        assert!("not-a-uuid".parse::<EntityId>().is_err());
    }
}
