//! Integrity-check utilities shared by every handler.
//!
//! These are deliberately free functions generic over the repository port —
//! the checks are one protocol repeated per entity type, not a base class.
//! Handlers run them sequentially and short-circuit on the first failure,
//! before any mutation or persist.

use refdata_core::{DomainError, DomainResult, Entity, Referential};

use crate::repository::{MasterRecord, Repository};

/// Load the primary target of an operation, failing with `NotFound` when the
/// id does not resolve.
pub async fn fetch<A: MasterRecord>(
    repo: &dyn Repository<A>,
    id: &A::Id,
    resource: &'static str,
) -> DomainResult<A>
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    repo.get(id)
        .await?
        .ok_or(DomainError::not_found(resource))
}

/// Uniqueness check: probe for an enabled record matching the natural-key
/// filter; a hit under a *different* identity is a collision. Writing a
/// record back under its own key is fine.
pub async fn ensure_unique<A: MasterRecord>(
    repo: &dyn Repository<A>,
    probe: A::Filter,
    candidate: &A::Id,
    resource: &'static str,
    key: &str,
) -> DomainResult<()>
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    if let Some(existing) = repo.find_one(&probe).await? {
        if existing.id() != candidate {
            return Err(DomainError::duplicate_key(resource, key));
        }
    }
    Ok(())
}

/// Existence check for a foreign reference. The referenced record must exist
/// and be enabled — new references to a disabled record would dangle the
/// moment the reference is followed through a default (enabled-only) read.
pub async fn ensure_exists<A: MasterRecord>(
    repo: &dyn Repository<A>,
    id: &A::Id,
    resource: &'static str,
) -> DomainResult<()>
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    match repo.get(id).await? {
        Some(record) if record.is_enabled() => Ok(()),
        _ => Err(DomainError::reference_not_found(resource, id.to_string())),
    }
}

/// Dependency check before disable: any live (enabled) dependent matching
/// the filter blocks the operation.
pub async fn ensure_not_in_use<D: MasterRecord>(
    dependents: &dyn Repository<D>,
    probe: D::Filter,
    resource: &'static str,
    dependent: &'static str,
) -> DomainResult<()>
where
    D::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    if dependents.count(&probe).await? > 0 {
        return Err(DomainError::resource_in_use(resource, dependent));
    }
    Ok(())
}
