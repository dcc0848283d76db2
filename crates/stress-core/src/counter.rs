//! Counter: how many synthetic records are present.

use crate::error::StoreError;
use crate::query::RecordQuery;
use crate::store::RecordStore;
use tracing::debug;

/// Count records carrying the hash metadata key.
///
/// Runs an unbounded ids-only query and reports the store's total match count.
pub async fn count_synthetic<S>(store: &S) -> Result<u64, StoreError>
where
    S: RecordStore + ?Sized,
{
    let result = store.query(&RecordQuery::synthetic_ids()).await?;
    debug!("{} synthetic records present", result.total_count);
    Ok(result.total_count)
}
