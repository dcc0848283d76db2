//! Host lifecycle entry points.
//!
//! The host fires `activate` once, `on_admin_load` and
//! `on_benchmark_page_render` any number of times, then `deactivate`. Nothing
//! here guards against overlapping calls: a count taken while seeding is
//! still running sees a partially seeded store.

use crate::benchmark::{run_benchmark, BenchmarkReport, BenchmarkSettings};
use crate::cleanup::{cleanup, CleanupReport};
use crate::counter::count_synthetic;
use crate::error::StoreError;
use crate::report::render_html;
use crate::seeder::{seed, SeedReport, DEFAULT_RECORD_COUNT};
use crate::store::RecordStore;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables for a stress test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressSettings {
    /// Records created on activation.
    pub record_count: u64,
    pub benchmark: BenchmarkSettings,
}

impl Default for StressSettings {
    fn default() -> Self {
        Self {
            record_count: DEFAULT_RECORD_COUNT,
            benchmark: BenchmarkSettings::default(),
        }
    }
}

/// A store plus the settings the entry points run with.
///
/// The synthetic record total is not cached here; callers pass the value
/// returned by [`StressTest::activate`] or [`StressTest::on_admin_load`] to
/// the benchmark explicitly.
pub struct StressTest<S> {
    store: S,
    settings: StressSettings,
}

impl<S: RecordStore> StressTest<S> {
    pub fn new(store: S, settings: StressSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &StressSettings {
        &self.settings
    }

    /// Seed the store. The report's `attempted` field is the running total.
    pub async fn activate(&self) -> Result<SeedReport, StoreError> {
        seed(&self.store, self.settings.record_count).await
    }

    /// Recount the synthetic records.
    pub async fn on_admin_load(&self) -> Result<u64, StoreError> {
        count_synthetic(&self.store).await
    }

    /// Run both benchmark scenarios with `record_total` as the running total.
    pub async fn benchmark<R>(
        &self,
        record_total: u64,
        rng: &mut R,
    ) -> Result<BenchmarkReport, StoreError>
    where
        R: Rng + ?Sized,
    {
        run_benchmark(&self.store, record_total, &self.settings.benchmark, rng).await
    }

    /// Run the benchmark and render the report page.
    pub async fn on_benchmark_page_render<R>(
        &self,
        record_total: u64,
        rng: &mut R,
    ) -> Result<String, StoreError>
    where
        R: Rng + ?Sized,
    {
        let report = self.benchmark(record_total, rng).await?;
        Ok(render_html(&report))
    }

    /// Permanently delete every synthetic record.
    pub async fn deactivate(&self) -> Result<CleanupReport, StoreError> {
        cleanup(&self.store).await
    }

    /// Give the store back.
    pub fn into_store(self) -> S {
        self.store
    }
}
