//! Benchmark Runner: two strategies for selecting rows by the hash attribute.
//!
//! Scenario 1 excludes a large set of hash values in a single unbounded
//! query, which makes the store count every matching row. Scenario 2 first
//! pulls a random, bounded page of ids and then fetches exactly those ids;
//! both queries are timed together as one unit.

use crate::error::StoreError;
use crate::query::{Filter, Ordering, PageSize, Projection, RecordQuery};
use crate::record::{hash_id, HASH_META_KEY};
use crate::sample::random_sample;
use crate::store::RecordStore;
use crate::timer::Stopwatch;
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;
use tracing::{debug, info};

/// Sampling parameters for the exclusion set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// Lowest integer that may be sampled.
    pub sample_min: i64,
    /// Highest integer that may be sampled (inclusive).
    pub sample_max: i64,
    /// How many distinct integers to draw.
    pub sample_size: usize,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            sample_min: 0,
            sample_max: 10_000,
            sample_size: 5_000,
        }
    }
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Timing of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    /// Wall-clock time of the whole scenario.
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs")]
    pub elapsed: Duration,
    /// Rows returned by the scenario's final query.
    pub rows_returned: u64,
    /// Total matching rows reported by the final query.
    pub total_count: u64,
    /// Queries issued, in order, rendered for display.
    pub queries: Vec<String>,
}

/// Everything the report page shows.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// Synthetic records present when the benchmark ran.
    pub record_total: u64,
    pub settings: BenchmarkSettings,
    /// Hashes actually placed in the exclusion set.
    pub sampled: usize,
    /// First sampled hash, shown as an example value.
    pub example_hash: Option<String>,
    pub exclusion_scan: ScenarioResult,
    pub id_narrowing: ScenarioResult,
    /// Ids returned by the first phase of the id-narrowing scenario.
    pub narrowed_ids: u64,
}

impl BenchmarkReport {
    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} records, {} sampled hashes: {} {:.6}s, {} {:.6}s",
            self.record_total,
            self.sampled,
            self.exclusion_scan.name,
            self.exclusion_scan.elapsed.as_secs_f64(),
            self.id_narrowing.name,
            self.id_narrowing.elapsed.as_secs_f64(),
        )
    }
}

/// Draw the exclusion sample and hash each integer.
///
/// The integers are not record ids, so unless the store happens to hold
/// exactly the sampled range the set mostly excludes nothing in particular.
pub fn sample_hashes<R>(settings: &BenchmarkSettings, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    random_sample(
        settings.sample_min,
        settings.sample_max,
        settings.sample_size,
        rng,
    )
    .into_iter()
    .map(hash_id)
    .collect()
}

/// Scenario 1 query: everything tagged with a hash outside `hashes`.
pub fn exclusion_scan_query(hashes: Vec<String>) -> RecordQuery {
    RecordQuery::new()
        .filter(Filter::MetaValueNotIn {
            key: HASH_META_KEY.to_string(),
            values: hashes,
        })
        .page_size(PageSize::Unbounded)
}

/// Scenario 2, first phase: a random half of the tagged ids.
pub fn id_page_query(record_total: u64) -> RecordQuery {
    RecordQuery::new()
        .filter(Filter::MetaKeyExists {
            key: HASH_META_KEY.to_string(),
        })
        .projection(Projection::Ids)
        .page_size(PageSize::Limit(record_total / 2))
        .ordering(Ordering::Random)
}

/// Scenario 2, second phase: the records behind `ids`, store default paging.
pub fn id_fetch_query(ids: Vec<u64>) -> RecordQuery {
    RecordQuery::new().filter(Filter::IdIn { ids })
}

/// Run both scenarios against `store`.
///
/// `record_total` is the Counter's latest result; it sizes Scenario 2's first
/// page and is not validated, so a total of 0 or 1 sends a zero page size to
/// the store. Store failures propagate immediately with no retry.
pub async fn run_benchmark<S, R>(
    store: &S,
    record_total: u64,
    settings: &BenchmarkSettings,
    rng: &mut R,
) -> Result<BenchmarkReport, StoreError>
where
    S: RecordStore + ?Sized,
    R: Rng + ?Sized,
{
    let hashes = sample_hashes(settings, rng);
    let sampled = hashes.len();
    let example_hash = hashes.first().cloned();
    debug!("Sampled {} exclusion hashes", sampled);

    // Scenario 1
    let query = exclusion_scan_query(hashes);
    let scenario1_queries = vec![query.to_string()];
    let stopwatch = Stopwatch::start();
    let result = store.query(&query).await?;
    let elapsed = stopwatch.stop();
    let exclusion_scan = ScenarioResult {
        name: "exclusion scan".to_string(),
        elapsed,
        rows_returned: result.len() as u64,
        total_count: result.total_count,
        queries: scenario1_queries,
    };
    info!(
        "Scenario 1 (exclusion scan): {} rows in {:?}",
        exclusion_scan.rows_returned, exclusion_scan.elapsed
    );

    // Scenario 2
    let page_query = id_page_query(record_total);
    let stopwatch = Stopwatch::start();
    let ids = store.query(&page_query).await?.ids();
    let narrowed_ids = ids.len() as u64;
    let fetch_query = id_fetch_query(ids);
    let result = store.query(&fetch_query).await?;
    let elapsed = stopwatch.stop();
    let id_narrowing = ScenarioResult {
        name: "two-phase id narrowing".to_string(),
        elapsed,
        rows_returned: result.len() as u64,
        total_count: result.total_count,
        queries: vec![page_query.to_string(), fetch_query.to_string()],
    };
    info!(
        "Scenario 2 (two-phase id narrowing): {} ids narrowed to {} rows in {:?}",
        narrowed_ids, id_narrowing.rows_returned, id_narrowing.elapsed
    );

    Ok(BenchmarkReport {
        record_total,
        settings: settings.clone(),
        sampled,
        example_hash,
        exclusion_scan,
        id_narrowing,
        narrowed_ids,
    })
}
