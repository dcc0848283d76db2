//! Cleanup: permanent removal of every synthetic record.

use crate::error::StoreError;
use crate::query::RecordQuery;
use crate::store::RecordStore;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    /// Records found carrying the hash metadata key.
    pub matched: u64,
    /// Records deleted.
    pub deleted: u64,
    #[serde(skip)]
    pub duration: Duration,
}

/// Find every record carrying the hash metadata key and delete it, bypassing
/// the trash.
///
/// Safe to run on an empty store: nothing matches and no delete is issued.
pub async fn cleanup<S>(store: &S) -> Result<CleanupReport, StoreError>
where
    S: RecordStore + ?Sized,
{
    let start_time = Instant::now();

    let result = store.query(&RecordQuery::synthetic_ids()).await?;
    let ids = result.ids();
    let mut report = CleanupReport {
        matched: ids.len() as u64,
        ..Default::default()
    };

    for id in ids {
        store.delete(id, true).await?;
        report.deleted += 1;
    }

    report.duration = start_time.elapsed();
    info!(
        "Cleanup complete: deleted {} of {} synthetic records in {:?}",
        report.deleted, report.matched, report.duration
    );

    Ok(report)
}
