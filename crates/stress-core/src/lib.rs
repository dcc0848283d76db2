//! Core of mysql-stress-test.
//!
//! Seeds a record store with synthetic rows tagged by a SHA-256 hash of their
//! id, then times two strategies for selecting rows by that hash:
//!
//! - **Scenario 1, exclusion scan**: one unbounded query excluding a sampled
//!   set of hashes, which forces the store to count every matching row.
//! - **Scenario 2, two-phase id narrowing**: a bounded random page of ids,
//!   followed by a fetch of exactly those ids.
//!
//! The store is any [`RecordStore`]. [`InMemoryStore`] ships here for tests;
//! the MySQL implementation lives in the `stress-store-mysql` crate.
//!
//! # Example
//!
//! ```ignore
//! use stress_core::{InMemoryStore, StressSettings, StressTest};
//!
//! let plugin = StressTest::new(InMemoryStore::new(), StressSettings::default());
//! let seeded = plugin.activate().await?;
//! let total = plugin.on_admin_load().await?;
//! let html = plugin.on_benchmark_page_render(total, &mut rand::rng()).await?;
//! plugin.deactivate().await?;
//! ```

pub mod benchmark;
pub mod cleanup;
pub mod counter;
mod error;
pub mod lifecycle;
pub mod memory;
pub mod query;
pub mod record;
pub mod report;
pub mod sample;
pub mod seeder;
mod store;
pub mod timer;

pub use benchmark::{run_benchmark, BenchmarkReport, BenchmarkSettings, ScenarioResult};
pub use cleanup::{cleanup, CleanupReport};
pub use counter::count_synthetic;
pub use error::StoreError;
pub use lifecycle::{StressSettings, StressTest};
pub use memory::InMemoryStore;
pub use query::{Filter, Ordering, PageSize, Projection, QueriedRecord, QueryResult, RecordQuery};
pub use record::{hash_id, NewRecord, Record, RecordStatus, HASH_META_KEY};
pub use report::render_html;
pub use seeder::{seed, SeedReport, DEFAULT_RECORD_COUNT};
pub use store::RecordStore;
pub use timer::Stopwatch;
