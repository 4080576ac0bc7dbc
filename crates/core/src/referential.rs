//! The capability set shared by every master-data record.

use crate::entity::Entity;

/// A referential (master-data) record.
///
/// Intentionally minimal: each record type is an independent struct, not part
/// of an inheritance hierarchy. Shared machinery (integrity checks, paging,
/// cache coherency) is generic over this trait plus the repository port.
pub trait Referential: Entity {
    /// Stable record-type name, e.g. `"geography.city"`. Used for event
    /// types, cache keys and error messages.
    const KIND: &'static str;

    /// Soft-delete flag. Records start enabled; disabling is the terminal
    /// lifecycle state (restorable via activate), never physical removal.
    fn is_enabled(&self) -> bool;
}
