//! In-memory repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use refdata_core::{DomainError, DomainResult, Entity, Page, PageRequest, Referential};
use refdata_events::{HasEvents, LifecycleEvent};

use crate::repository::{MasterRecord, Repository};

/// BTreeMap-backed store.
///
/// Keyed by id, so iteration order is id order — with v7 ids that is
/// creation order, which is the "storage-defined order" paged queries
/// expose. Writes are staged and only become visible at `save()`.
pub struct MemoryRepository<A: MasterRecord>
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    rows: RwLock<BTreeMap<A::Id, A>>,
    staged: Mutex<Vec<A>>,
}

impl<A: MasterRecord> MemoryRepository<A>
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            staged: Mutex::new(Vec::new()),
        }
    }
}

impl<A: MasterRecord> Default for MemoryRepository<A>
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: MasterRecord> Repository<A> for MemoryRepository<A>
where
    A::Id: Ord + core::fmt::Display + Send + Sync + 'static,
{
    async fn get(&self, id: &A::Id) -> DomainResult<Option<A>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn find_one(&self, filter: &A::Filter) -> DomainResult<Option<A>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|r| r.matches(filter))
            .cloned())
    }

    async fn page(&self, filter: &A::Filter, page: &PageRequest) -> DomainResult<Page<A>> {
        let rows = self.rows.read().await;
        let matches: Vec<&A> = rows.values().filter(|r| r.matches(filter)).collect();
        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(page.offset())
            .take(page.page_size() as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn count(&self, filter: &A::Filter) -> DomainResult<u64> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|r| r.matches(filter))
            .count() as u64)
    }

    async fn add(&self, record: A) -> DomainResult<()> {
        self.staged.lock().await.push(record);
        Ok(())
    }

    async fn update(&self, record: A) -> DomainResult<()> {
        self.staged.lock().await.push(record);
        Ok(())
    }

    async fn save(&self) -> DomainResult<Vec<LifecycleEvent>> {
        let mut staged = self.staged.lock().await;
        let mut rows = self.rows.write().await;

        // Authoritative uniqueness guard: the handler-level probe is only a
        // fast path, the commit re-checks the natural key among enabled
        // records so racing writers cannot both land.
        let mut collision = None;
        for candidate in staged.iter() {
            if !candidate.is_enabled() {
                continue;
            }
            let key = candidate.natural_key();
            let taken = rows.values().any(|existing| {
                existing.id() != candidate.id()
                    && existing.is_enabled()
                    && existing.natural_key() == key
            }) || staged.iter().any(|other| {
                other.id() != candidate.id()
                    && other.is_enabled()
                    && other.natural_key() == key
            });
            if taken {
                collision = Some(key);
                break;
            }
        }
        if let Some(key) = collision {
            staged.clear();
            return Err(DomainError::duplicate_key(A::KIND, key));
        }

        let mut events = Vec::new();
        for mut record in staged.drain(..) {
            events.extend(record.take_events());
            rows.insert(record.id().clone(), record);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdata_events::{EventLog, HasEvents, LifecycleEvent, LifecycleKind};
    use serde::{Deserialize, Serialize};

    use refdata_core::EntityId;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Label {
        id: EntityId,
        code: String,
        is_enabled: bool,
        #[serde(skip, default)]
        events: EventLog,
    }

    impl Label {
        fn new(code: &str) -> Self {
            let mut label = Self {
                id: EntityId::new(),
                code: code.into(),
                is_enabled: true,
                events: EventLog::new(),
            };
            label.events.record(LifecycleEvent::new(
                "test.label",
                *label.id.as_uuid(),
                LifecycleKind::Created,
                serde_json::Value::Null,
            ));
            label
        }
    }

    impl refdata_core::Entity for Label {
        type Id = EntityId;

        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    impl refdata_core::Referential for Label {
        const KIND: &'static str = "test.label";

        fn is_enabled(&self) -> bool {
            self.is_enabled
        }
    }

    impl HasEvents for Label {
        fn pending_events(&self) -> &[LifecycleEvent] {
            self.events.pending()
        }

        fn take_events(&mut self) -> Vec<LifecycleEvent> {
            self.events.drain()
        }
    }

    #[derive(Debug, Default)]
    struct LabelFilter {
        code: Option<String>,
        enabled: Option<bool>,
    }

    impl MasterRecord for Label {
        type Filter = LabelFilter;

        fn matches(&self, f: &LabelFilter) -> bool {
            f.code
                .as_deref()
                .map_or(true, |c| self.code.eq_ignore_ascii_case(c))
                && f.enabled.map_or(true, |e| self.is_enabled == e)
        }

        fn natural_key(&self) -> String {
            self.code.to_uppercase()
        }
    }

    #[tokio::test]
    async fn staged_writes_stay_invisible_until_save() {
        let repo = MemoryRepository::<Label>::new();
        let label = Label::new("A");
        let id = label.id;

        repo.add(label).await.unwrap();
        assert!(repo.get(&id).await.unwrap().is_none());

        let events = repo.save().await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(repo.get(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn committed_records_carry_no_pending_events() {
        let repo = MemoryRepository::<Label>::new();
        let label = Label::new("A");
        let id = label.id;
        repo.add(label).await.unwrap();
        repo.save().await.unwrap();

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert!(stored.pending_events().is_empty());
    }

    #[tokio::test]
    async fn commit_rejects_a_natural_key_collision_across_saves() {
        let repo = MemoryRepository::<Label>::new();
        repo.add(Label::new("A")).await.unwrap();
        repo.save().await.unwrap();

        repo.add(Label::new("a")).await.unwrap();
        let err = repo.save().await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));

        // The rejected batch is gone; the store is usable afterwards.
        repo.add(Label::new("B")).await.unwrap();
        repo.save().await.unwrap();
        assert_eq!(repo.count(&LabelFilter::default()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn commit_rejects_a_collision_inside_one_batch() {
        let repo = MemoryRepository::<Label>::new();
        repo.add(Label::new("A")).await.unwrap();
        repo.add(Label::new("A")).await.unwrap();
        assert!(repo.save().await.is_err());
    }

    #[tokio::test]
    async fn disabled_records_do_not_hold_their_key() {
        let repo = MemoryRepository::<Label>::new();
        let mut first = Label::new("A");
        first.is_enabled = false;
        repo.add(first).await.unwrap();
        repo.save().await.unwrap();

        repo.add(Label::new("A")).await.unwrap();
        repo.save().await.unwrap();
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_cover_every_match() {
        let repo = MemoryRepository::<Label>::new();
        for i in 0..25 {
            repo.add(Label::new(&format!("L{i:02}"))).await.unwrap();
        }
        repo.save().await.unwrap();

        let filter = LabelFilter::default();
        let mut seen = std::collections::BTreeSet::new();
        let mut page_number = 1;
        loop {
            let request = PageRequest::new(page_number, 4).unwrap();
            let page = repo.page(&filter, &request).await.unwrap();
            assert_eq!(page.total_count, 25);
            assert!(page.items.len() <= 4);
            if page.items.is_empty() {
                break;
            }
            for item in &page.items {
                assert!(seen.insert(item.id), "page overlap at {}", item.code);
            }
            page_number += 1;
        }
        assert_eq!(seen.len(), 25);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Pagination law: every page holds at most `page_size` items and
            /// the pages together sum to `total_count`.
            #[test]
            fn page_sizes_sum_to_the_total(record_count in 0usize..40, page_size in 1u32..10) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(async {
                    let repo = MemoryRepository::<Label>::new();
                    for i in 0..record_count {
                        repo.add(Label::new(&format!("L{i:03}"))).await.unwrap();
                    }
                    repo.save().await.unwrap();

                    let filter = LabelFilter::default();
                    let mut collected = 0usize;
                    let mut page_number = 1u32;
                    loop {
                        let request = PageRequest::new(page_number, page_size).unwrap();
                        let page = repo.page(&filter, &request).await.unwrap();
                        prop_assert_eq!(page.total_count as usize, record_count);
                        prop_assert!(page.items.len() <= page_size as usize);
                        if page.items.is_empty() {
                            break;
                        }
                        collected += page.items.len();
                        page_number += 1;
                    }
                    prop_assert_eq!(collected, record_count);
                    Ok(())
                })?;
            }
        }
    }
}
