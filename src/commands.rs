//! Subcommand handlers.
//!
//! Each handler fires one lifecycle entry point against the selected store
//! and hands the store back so the caller can release it.

use anyhow::Context;
use clap::Subcommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stress_core::{BenchmarkReport, InMemoryStore, RecordStore, StressSettings, StressTest};
use stress_store_mysql::{MySQLRecordStore, DEFAULT_TABLE_PREFIX};

use crate::config::StressConfig;
use crate::{mask_connection_password, BenchmarkOpts, ReportFormat, StoreKind, StoreOpts};

/// Lifecycle subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Seed synthetic records (plugin activation)
    Activate {
        /// Number of records to create (default: 10000)
        #[arg(long)]
        record_count: Option<u64>,
    },

    /// Count synthetic records currently present (admin load)
    Count,

    /// Run both query scenarios and render the report (benchmark page)
    Benchmark {
        #[command(flatten)]
        opts: BenchmarkOpts,
    },

    /// Permanently delete every synthetic record (plugin deactivation)
    Deactivate {
        /// Also drop the posts and postmeta tables afterwards (MySQL only)
        #[arg(long)]
        drop_tables: bool,
    },

    /// Activate, count, benchmark and deactivate in one invocation
    Run {
        /// Number of records to create (default: 10000)
        #[arg(long)]
        record_count: Option<u64>,

        #[command(flatten)]
        opts: BenchmarkOpts,

        /// Leave the synthetic records in place instead of deactivating
        #[arg(long)]
        keep: bool,
    },
}

/// Merge command-line overrides over the configuration file.
pub fn resolve_settings(
    config: &StressConfig,
    record_count: Option<u64>,
    opts: &BenchmarkOpts,
) -> StressSettings {
    let mut settings = config.stress.clone();
    if let Some(count) = record_count {
        settings.record_count = count;
    }
    if let Some(size) = opts.sample_size {
        settings.benchmark.sample_size = size;
    }
    if let Some(min) = opts.sample_min {
        settings.benchmark.sample_min = min;
    }
    if let Some(max) = opts.sample_max {
        settings.benchmark.sample_max = max;
    }
    settings
}

/// Render a report in the requested format.
pub fn render_report(report: &BenchmarkReport, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Html => Ok(stress_core::render_html(report)),
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
    }
}

fn emit_report(report: &BenchmarkReport, opts: &BenchmarkOpts) -> anyhow::Result<()> {
    let rendered = render_report(report, opts.format)?;
    match &opts.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn benchmark_rng(config: &StressConfig, opts: &BenchmarkOpts) -> StdRng {
    match opts.seed.or(config.seed) {
        Some(seed) => {
            tracing::info!("Sampling with seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

/// Run `command` against `store` and return the store.
pub async fn run_command<S: RecordStore>(
    store: S,
    config: &StressConfig,
    command: Commands,
) -> anyhow::Result<S> {
    match command {
        Commands::Activate { record_count } => {
            let settings = resolve_settings(config, record_count, &BenchmarkOpts::default());
            let plugin = StressTest::new(store, settings);
            let report = plugin.activate().await.context("Seeding failed")?;
            tracing::info!(
                "Activated: {} of {} records seeded ({} failures)",
                report.inserted,
                report.attempted,
                report.failures
            );
            Ok(plugin.into_store())
        }
        Commands::Count => {
            let plugin = StressTest::new(store, config.stress.clone());
            let total = plugin
                .on_admin_load()
                .await
                .context("Failed to count synthetic records")?;
            println!("{total}");
            Ok(plugin.into_store())
        }
        Commands::Benchmark { opts } => {
            let plugin = StressTest::new(store, resolve_settings(config, None, &opts));
            let total = plugin
                .on_admin_load()
                .await
                .context("Failed to count synthetic records")?;
            let mut rng = benchmark_rng(config, &opts);
            let report = plugin
                .benchmark(total, &mut rng)
                .await
                .context("Benchmark failed")?;
            tracing::info!("{}", report.summary());
            emit_report(&report, &opts)?;
            Ok(plugin.into_store())
        }
        Commands::Deactivate { .. } => {
            let plugin = StressTest::new(store, config.stress.clone());
            let report = plugin.deactivate().await.context("Cleanup failed")?;
            tracing::info!("Deactivated: {} synthetic records deleted", report.deleted);
            Ok(plugin.into_store())
        }
        Commands::Run {
            record_count,
            opts,
            keep,
        } => {
            let plugin = StressTest::new(store, resolve_settings(config, record_count, &opts));
            let seeded = plugin.activate().await.context("Seeding failed")?;
            tracing::info!(
                "Activated: {} of {} records seeded ({} failures)",
                seeded.inserted,
                seeded.attempted,
                seeded.failures
            );

            let total = plugin
                .on_admin_load()
                .await
                .context("Failed to count synthetic records")?;
            let mut rng = benchmark_rng(config, &opts);
            let report = plugin
                .benchmark(total, &mut rng)
                .await
                .context("Benchmark failed")?;
            tracing::info!("{}", report.summary());
            emit_report(&report, &opts)?;

            if keep {
                tracing::info!("Keeping {} synthetic records (--keep)", total);
            } else {
                let cleaned = plugin.deactivate().await.context("Cleanup failed")?;
                tracing::info!("Deactivated: {} synthetic records deleted", cleaned.deleted);
            }
            Ok(plugin.into_store())
        }
    }
}

/// Build the selected store, run `command`, and release the store.
pub async fn execute(opts: StoreOpts, command: Commands) -> anyhow::Result<()> {
    let config = StressConfig::load(opts.config.as_deref())?;

    match opts.store {
        StoreKind::Memory => {
            if !matches!(command, Commands::Run { .. }) {
                tracing::warn!(
                    "The memory store does not persist between invocations; use `run` for a full cycle"
                );
            }
            run_command(InMemoryStore::new(), &config, command).await?;
        }
        StoreKind::MySQL => {
            let connection_string = opts
                .mysql_connection_string
                .or_else(|| config.mysql.connection_string.clone())
                .context(
                    "MySQL connection string required (--mysql-connection-string, \
                     MYSQL_CONNECTION_STRING or [mysql] connection_string)",
                )?;
            let table_prefix = opts
                .table_prefix
                .or_else(|| config.mysql.table_prefix.clone())
                .unwrap_or_else(|| DEFAULT_TABLE_PREFIX.to_string());

            tracing::info!(
                "Connecting to MySQL at {} (table prefix '{}')",
                mask_connection_password(&connection_string),
                table_prefix
            );
            let store = MySQLRecordStore::new(&connection_string, &table_prefix)
                .context("Invalid MySQL store configuration")?;
            store.ping().await.context("Failed to connect to MySQL")?;
            store
                .ensure_schema()
                .await
                .context("Failed to create tables")?;

            let drop_tables = matches!(command, Commands::Deactivate { drop_tables: true });
            let store = run_command(store, &config, command).await?;
            if drop_tables {
                store.drop_schema().await.context("Failed to drop tables")?;
            }
            store
                .disconnect()
                .await
                .context("Failed to close MySQL connections")?;
        }
    }

    Ok(())
}
