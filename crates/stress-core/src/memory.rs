//! In-memory record store.
//!
//! Mirrors the behaviour of the MySQL store closely enough to drive the whole
//! lifecycle in tests and in the CLI's `--store memory` mode: ids start at 1
//! and increase, trashed records are invisible to queries, and the default
//! page size is 10.

use crate::error::StoreError;
use crate::query::{Filter, Ordering, PageSize, Projection, QueriedRecord, QueryResult, RecordQuery};
use crate::record::{NewRecord, Record, RecordStatus};
use crate::store::RecordStore;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::Mutex;

/// Page size applied for [`PageSize::StoreDefault`].
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Default)]
struct Tables {
    next_id: u64,
    records: BTreeMap<u64, Record>,
    /// (key, value) pairs per record id, in insertion order.
    meta: BTreeMap<u64, Vec<(String, String)>>,
}

/// A [`Filter`] with its value sets hashed for lookup.
enum Predicate<'a> {
    MetaKeyExists(&'a str),
    MetaValueNotIn(&'a str, HashSet<&'a str>),
    IdIn(HashSet<u64>),
}

impl<'a> Predicate<'a> {
    fn compile(filter: &'a Filter) -> Self {
        match filter {
            Filter::MetaKeyExists { key } => Predicate::MetaKeyExists(key),
            Filter::MetaValueNotIn { key, values } => {
                Predicate::MetaValueNotIn(key, values.iter().map(String::as_str).collect())
            }
            Filter::IdIn { ids } => Predicate::IdIn(ids.iter().copied().collect()),
        }
    }

    fn matches(&self, id: u64, meta: Option<&Vec<(String, String)>>) -> bool {
        match self {
            Predicate::MetaKeyExists(key) => {
                meta.is_some_and(|entries| entries.iter().any(|(k, _)| k == key))
            }
            Predicate::MetaValueNotIn(key, excluded) => meta.is_some_and(|entries| {
                entries
                    .iter()
                    .any(|(k, v)| k == key && !excluded.contains(v.as_str()))
            }),
            Predicate::IdIn(ids) => ids.contains(&id),
        }
    }
}

/// Record store held entirely in process memory.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    default_page_size: u64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_id: 1,
                ..Default::default()
            }),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size used for [`PageSize::StoreDefault`].
    pub fn with_default_page_size(mut self, page_size: u64) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Number of stored records, trashed ones included.
    pub async fn record_count(&self) -> usize {
        self.tables.lock().await.records.len()
    }

    /// Metadata entries stored for `id`.
    pub async fn metadata(&self, id: u64) -> Vec<(String, String)> {
        self.tables
            .lock()
            .await
            .meta
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    /// Status of a stored record, if it exists.
    pub async fn status(&self, id: u64) -> Option<RecordStatus> {
        self.tables
            .lock()
            .await
            .records
            .get(&id)
            .map(|record| record.status)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn store_type(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, record: NewRecord) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        let id = tables.next_id;
        tables.next_id += 1;
        tables.records.insert(
            id,
            Record {
                id,
                title: record.title,
                status: record.status,
            },
        );
        Ok(id)
    }

    async fn set_metadata(&self, id: u64, key: &str, value: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.records.contains_key(&id) {
            return Err(StoreError::RecordNotFound(id));
        }
        tables
            .meta
            .entry(id)
            .or_default()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }

    async fn query(&self, query: &RecordQuery) -> Result<QueryResult, StoreError> {
        let tables = self.tables.lock().await;
        let predicates: Vec<Predicate<'_>> = query.filters.iter().map(Predicate::compile).collect();

        // Newest first: ids are assigned in insertion order.
        let mut matched: Vec<&Record> = tables
            .records
            .values()
            .rev()
            .filter(|record| record.status != RecordStatus::Trash)
            .filter(|record| {
                let meta = tables.meta.get(&record.id);
                predicates.iter().all(|p| p.matches(record.id, meta))
            })
            .collect();

        if query.ordering == Ordering::Random {
            matched.shuffle(&mut rand::rng());
        }

        let total_count = matched.len() as u64;
        let limit = match query.page_size {
            PageSize::Unbounded => matched.len(),
            PageSize::Limit(n) => usize::try_from(n).unwrap_or(usize::MAX),
            PageSize::StoreDefault => {
                usize::try_from(self.default_page_size).unwrap_or(usize::MAX)
            }
        };

        let items = matched
            .into_iter()
            .take(limit)
            .map(|record| match query.projection {
                Projection::Ids => QueriedRecord::Id(record.id),
                Projection::Full => QueriedRecord::Full(record.clone()),
            })
            .collect();

        Ok(QueryResult { items, total_count })
    }

    async fn delete(&self, id: u64, permanent: bool) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if permanent {
            tables
                .records
                .remove(&id)
                .ok_or(StoreError::RecordNotFound(id))?;
            tables.meta.remove(&id);
        } else {
            let record = tables
                .records
                .get_mut(&id)
                .ok_or(StoreError::RecordNotFound(id))?;
            record.status = RecordStatus::Trash;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{hash_id, HASH_META_KEY};

    fn id_set(result: &QueryResult) -> HashSet<u64> {
        result.ids().into_iter().collect()
    }

    async fn seeded_store(n: u64) -> InMemoryStore {
        let store = InMemoryStore::new();
        for i in 0..n {
            let id = store
                .insert(NewRecord::published(format!("Test Post {i}")))
                .await
                .unwrap();
            store
                .set_metadata(id, HASH_META_KEY, &hash_id(id))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_ids_start_at_one() {
        let store = InMemoryStore::new();
        assert_eq!(store.insert(NewRecord::published("a")).await.unwrap(), 1);
        assert_eq!(store.insert(NewRecord::published("b")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_metadata_on_missing_record() {
        let store = InMemoryStore::new();
        let err = store.set_metadata(99, HASH_META_KEY, "x").await.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(99)));
    }

    #[tokio::test]
    async fn test_default_page_size_and_order() {
        let store = seeded_store(25).await;
        let result = store.query(&RecordQuery::new()).await.unwrap();

        assert_eq!(result.total_count, 25);
        assert_eq!(result.len(), DEFAULT_PAGE_SIZE as usize);
        assert_eq!(result.ids()[0], 25);
        assert!(matches!(result.items[0], QueriedRecord::Full(_)));
    }

    #[tokio::test]
    async fn test_meta_key_exists_filter() {
        let store = seeded_store(3).await;
        store.insert(NewRecord::published("untagged")).await.unwrap();

        let result = store.query(&RecordQuery::synthetic_ids()).await.unwrap();
        assert_eq!(result.total_count, 3);
        assert_eq!(result.ids(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_meta_value_not_in_filter() {
        let store = seeded_store(5).await;
        let query = RecordQuery::new()
            .filter(Filter::MetaValueNotIn {
                key: HASH_META_KEY.to_string(),
                values: vec![hash_id(1), hash_id(4), hash_id(999)],
            })
            .page_size(PageSize::Unbounded);

        let result = store.query(&query).await.unwrap();
        assert_eq!(result.ids(), vec![5, 3, 2]);
        assert_eq!(result.total_count, 3);
    }

    #[tokio::test]
    async fn test_id_in_filter() {
        let store = seeded_store(5).await;
        let query = RecordQuery::new().filter(Filter::IdIn { ids: vec![2, 4, 42] });
        let result = store.query(&query).await.unwrap();
        assert_eq!(result.ids(), vec![4, 2]);

        let empty = RecordQuery::new().filter(Filter::IdIn { ids: vec![] });
        let result = store.query(&empty).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_count, 0);
    }

    #[tokio::test]
    async fn test_random_order_with_limit() {
        let store = seeded_store(20).await;
        let query = RecordQuery::synthetic_ids()
            .page_size(PageSize::Limit(10))
            .ordering(Ordering::Random);

        let result = store.query(&query).await.unwrap();
        assert_eq!(result.len(), 10);
        assert_eq!(result.total_count, 20);
        assert_eq!(id_set(&result).len(), 10);
        assert!(result.ids().iter().all(|id| (1..=20).contains(id)));
    }

    #[tokio::test]
    async fn test_zero_limit_passes_through() {
        let store = seeded_store(4).await;
        let query = RecordQuery::synthetic_ids().page_size(PageSize::Limit(0));
        let result = store.query(&query).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_count, 4);
    }

    #[tokio::test]
    async fn test_trash_hides_record() {
        let store = seeded_store(3).await;
        store.delete(2, false).await.unwrap();

        assert_eq!(store.status(2).await, Some(RecordStatus::Trash));
        assert_eq!(store.record_count().await, 3);
        let result = store.query(&RecordQuery::synthetic_ids()).await.unwrap();
        assert_eq!(result.ids(), vec![3, 1]);
    }

    #[tokio::test]
    async fn test_permanent_delete_removes_meta() {
        let store = seeded_store(2).await;
        store.delete(1, true).await.unwrap();

        assert_eq!(store.record_count().await, 1);
        assert!(store.metadata(1).await.is_empty());
        let err = store.delete(1, true).await.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(1)));
    }
}
