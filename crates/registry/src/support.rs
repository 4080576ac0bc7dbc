//! Shared cache-coherency and event-publishing helpers.

use refdata_cache::{Cache, DEFAULT_TTL, entry_key, get_typed, set_typed};
use refdata_core::{DomainError, DomainResult, Entity};
use refdata_events::{EventBus, LifecycleEvent};
use refdata_store::{MasterRecord, Repository};

/// Read-through get: cache hit short-circuits the repository; a miss loads
/// and seeds the direct `{kind}_{id}` entry.
pub(crate) async fn cached_get<A: MasterRecord>(
    cache: &dyn Cache,
    repo: &dyn Repository<A>,
    id: &A::Id,
    resource: &'static str,
) -> DomainResult<A>
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    let key = entry_key(A::KIND, id);
    if let Some(hit) = get_typed::<A>(cache, &key).await {
        return Ok(hit);
    }
    let record = repo
        .get(id)
        .await?
        .ok_or(DomainError::not_found(resource))?;
    set_typed(cache, &key, &record, DEFAULT_TTL).await;
    Ok(record)
}

/// Prefix invalidation: drop every cached entry for this record type. Run
/// after any successful write, since paged query results may have changed.
pub(crate) async fn invalidate(cache: &dyn Cache, kind: &str) {
    cache.remove_by_prefix(kind).await;
}

/// Update coherency: drop the type's entries, then re-seed the fresh record
/// under its direct key so the next get short-circuits the repository.
pub(crate) async fn refresh<A: MasterRecord>(cache: &dyn Cache, record: &A)
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    cache.remove_by_prefix(A::KIND).await;
    let key = entry_key(A::KIND, record.id());
    set_typed(cache, &key, record, DEFAULT_TTL).await;
}

/// Hand the drained events to the bus. Publish failures are logged and
/// swallowed: the write already committed, the audit stream is best-effort.
pub(crate) fn publish(bus: &dyn EventBus<LifecycleEvent>, events: Vec<LifecycleEvent>) {
    for event in events {
        tracing::debug!(
            event_type = %event.event_type(),
            aggregate_id = %event.aggregate_id(),
            "lifecycle event"
        );
        if let Err(err) = bus.publish(event) {
            tracing::warn!(error = %err, "failed to publish lifecycle event");
        }
    }
}
