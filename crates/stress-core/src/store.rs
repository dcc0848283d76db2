//! The record store interface consumed by every operation.

use crate::error::StoreError;
use crate::query::{QueryResult, RecordQuery};
use crate::record::NewRecord;
use async_trait::async_trait;

/// Minimal capability set of a relational content store.
///
/// Every call is a blocking round-trip from the caller's point of view: the
/// operations in this crate await each call before issuing the next.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short store identifier for logs ("mysql", "memory").
    fn store_type(&self) -> &'static str;

    /// Insert a record and return the id the store assigned to it.
    async fn insert(&self, record: NewRecord) -> Result<u64, StoreError>;

    /// Attach a metadata entry to a record.
    async fn set_metadata(&self, id: u64, key: &str, value: &str) -> Result<(), StoreError>;

    /// Run a query.
    async fn query(&self, query: &RecordQuery) -> Result<QueryResult, StoreError>;

    /// Delete a record. `permanent = false` moves it to the trash instead.
    async fn delete(&self, id: u64, permanent: bool) -> Result<(), StoreError>;
}
