//! Repository port.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use refdata_core::{DomainResult, Page, PageRequest, Referential};
use refdata_events::{HasEvents, LifecycleEvent};

/// A record type the store knows how to manage.
///
/// Adds to [`Referential`] what storage needs: a filter-criteria type for
/// paged queries, the natural key for the commit-time uniqueness guard, and
/// event draining for the unit of work. Serde bounds exist because records
/// are cached as JSON and snapshotted into lifecycle events.
pub trait MasterRecord:
    Referential + HasEvents + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
where
    Self::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    /// Entity-specific filter criteria. All supplied fields are ANDed;
    /// `Default` expresses "enabled records, no other constraint".
    type Filter: Default + Send + Sync;

    /// Conjunction over every supplied criteria field.
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// The business key required to be unique among enabled records of this
    /// type. Composite keys join their parts into one string.
    fn natural_key(&self) -> String;
}

/// Per-record-type storage port.
///
/// `add`/`update` stage a write; nothing becomes visible to reads until
/// `save()` commits. A handler performs at most one `save` per invocation,
/// so dropping the future before that point leaves no partial state.
#[async_trait]
pub trait Repository<A>: Send + Sync
where
    A: MasterRecord,
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    /// Fetch one record by identity, disabled records included.
    async fn get(&self, id: &A::Id) -> DomainResult<Option<A>>;

    /// First committed record matching the filter, in storage order.
    async fn find_one(&self, filter: &A::Filter) -> DomainResult<Option<A>>;

    /// One page of matches plus the total count ignoring paging.
    async fn page(&self, filter: &A::Filter, page: &PageRequest) -> DomainResult<Page<A>>;

    /// Total matches for the filter.
    async fn count(&self, filter: &A::Filter) -> DomainResult<u64>;

    /// Stage a brand-new record.
    async fn add(&self, record: A) -> DomainResult<()>;

    /// Stage a replacement for an existing record.
    async fn update(&self, record: A) -> DomainResult<()>;

    /// Commit staged writes and drain their pending lifecycle events.
    async fn save(&self) -> DomainResult<Vec<LifecycleEvent>>;
}
