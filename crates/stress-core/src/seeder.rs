//! Seeder: bulk creation of synthetic records.

use crate::error::StoreError;
use crate::record::{hash_id, synthetic_title, NewRecord, HASH_META_KEY};
use crate::store::RecordStore;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Number of records created on activation.
pub const DEFAULT_RECORD_COUNT: u64 = 10_000;

/// Progress is logged every this many records.
const PROGRESS_INTERVAL: u64 = 1_000;

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    /// Loop iterations completed. This is the running total handed to the
    /// benchmark, whether or not every insert succeeded.
    pub attempted: u64,
    /// Records inserted and tagged with their hash.
    pub inserted: u64,
    /// Inserts or metadata writes that failed without ending the run.
    pub failures: u64,
    #[serde(skip)]
    pub duration: Duration,
}

impl SeedReport {
    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.inserted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Insert `count` records titled `"Test Post {i}"` one at a time and tag each
/// with the SHA-256 of its assigned id.
///
/// Nothing is rolled back. A failed insert or metadata write is logged and
/// counted and the loop moves on; only a fatal store error (see
/// [`StoreError::is_fatal`]) stops it, leaving a partially seeded store that
/// Cleanup can still clear.
pub async fn seed<S>(store: &S, count: u64) -> Result<SeedReport, StoreError>
where
    S: RecordStore + ?Sized,
{
    let start_time = Instant::now();
    let mut report = SeedReport::default();

    info!(
        "Seeding {} synthetic records into {} store",
        count,
        store.store_type()
    );

    for i in 0..count {
        report.attempted = i + 1;

        let id = match store.insert(NewRecord::published(synthetic_title(i))).await {
            Ok(id) => id,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Failed to insert record {}: {}", i, e);
                report.failures += 1;
                continue;
            }
        };

        match store.set_metadata(id, HASH_META_KEY, &hash_id(id)).await {
            Ok(()) => report.inserted += 1,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Failed to tag record {} with its hash: {}", id, e);
                report.failures += 1;
            }
        }

        if report.attempted % PROGRESS_INTERVAL == 0 {
            debug!("Seeded {}/{} records", report.attempted, count);
        }
    }

    report.duration = start_time.elapsed();

    info!(
        "Seeding complete: {} records in {:?} ({:.2} records/sec, {} failures)",
        report.inserted,
        report.duration,
        report.records_per_second(),
        report.failures
    );

    Ok(report)
}
