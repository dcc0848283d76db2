//! End-to-end lifecycle tests against the in-memory store.
//!
//! Drives the same entry points the CLI fires:
//! 1. Activate (seed)
//! 2. Admin load (count)
//! 3. Benchmark page
//! 4. Deactivate (cleanup)

use mysql_stress_test::commands::{execute, Commands};
use mysql_stress_test::{BenchmarkOpts, ReportFormat, StoreKind, StoreOpts};
use rand::rngs::StdRng;
use rand::SeedableRng;
use stress_core::{
    hash_id, BenchmarkSettings, InMemoryStore, RecordStore, StressSettings, StressTest,
    HASH_META_KEY,
};

fn settings(record_count: u64) -> StressSettings {
    StressSettings {
        record_count,
        benchmark: BenchmarkSettings::default(),
    }
}

#[tokio::test]
async fn test_three_record_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let plugin = StressTest::new(InMemoryStore::new(), settings(3));

    let seeded = plugin.activate().await?;
    assert_eq!(seeded.attempted, 3);

    for id in 1..=3u64 {
        assert_eq!(
            plugin.store().metadata(id).await,
            vec![(HASH_META_KEY.to_string(), hash_id(id.to_string()))]
        );
    }
    assert_eq!(plugin.on_admin_load().await?, 3);

    let cleaned = plugin.deactivate().await?;
    assert_eq!(cleaned.deleted, 3);
    assert_eq!(plugin.on_admin_load().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_count_equals_seeded_for_various_sizes() -> Result<(), Box<dyn std::error::Error>> {
    for n in [0u64, 1, 17, 250] {
        let plugin = StressTest::new(InMemoryStore::new(), settings(n));
        plugin.activate().await?;
        assert_eq!(plugin.on_admin_load().await?, n, "count after seeding {n}");
    }
    Ok(())
}

#[tokio::test]
async fn test_cleanup_twice_is_noop() -> Result<(), Box<dyn std::error::Error>> {
    let plugin = StressTest::new(InMemoryStore::new(), settings(20));
    plugin.activate().await?;

    let first = plugin.deactivate().await?;
    assert_eq!(first.deleted, 20);

    let second = plugin.deactivate().await?;
    assert_eq!(second.matched, 0);
    assert_eq!(second.deleted, 0);
    assert_eq!(plugin.store().record_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn test_benchmark_page_at_full_scale() -> Result<(), Box<dyn std::error::Error>> {
    let plugin = StressTest::new(InMemoryStore::new(), StressSettings::default());
    let seeded = plugin.activate().await?;
    assert_eq!(seeded.attempted, 10_000);

    let total = plugin.on_admin_load().await?;
    let mut rng = StdRng::seed_from_u64(42);
    let report = plugin.benchmark(total, &mut rng).await?;

    assert_eq!(report.sampled, 5_000);
    assert_eq!(report.narrowed_ids, 5_000);
    // Sampled hashes cover integers in [0, 10000]; ids run 1..=10000, so the
    // exclusion removes between 4999 and 5000 records.
    let kept = report.exclusion_scan.rows_returned;
    assert!((5_000..=5_001).contains(&kept), "kept {kept}");
    assert_eq!(report.exclusion_scan.total_count, kept);
    assert_eq!(report.id_narrowing.total_count, 5_000);
    assert_eq!(report.id_narrowing.rows_returned, 10);

    let html = stress_core::render_html(&report);
    assert_eq!(html.matches("Execution Time:").count(), 2);

    plugin.deactivate().await?;
    assert_eq!(plugin.store().store_type(), "memory");
    Ok(())
}

#[tokio::test]
async fn test_partially_seeded_store_is_cleanable() -> Result<(), Box<dyn std::error::Error>> {
    let store = InMemoryStore::new();
    // Simulate a crash after three records, one of them untagged.
    for i in 0..3u64 {
        let id = store
            .insert(stress_core::NewRecord::published(format!("Test Post {i}")))
            .await?;
        if i != 1 {
            store.set_metadata(id, HASH_META_KEY, &hash_id(id)).await?;
        }
    }

    let plugin = StressTest::new(store, settings(3));
    assert_eq!(plugin.on_admin_load().await?, 2);
    let cleaned = plugin.deactivate().await?;
    assert_eq!(cleaned.deleted, 2);
    assert_eq!(plugin.store().record_count().await, 1);

    Ok(())
}

#[tokio::test]
async fn test_execute_run_with_memory_store() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("report.json");

    let opts = StoreOpts {
        store: StoreKind::Memory,
        mysql_connection_string: None,
        table_prefix: None,
        config: None,
    };
    let command = Commands::Run {
        record_count: Some(50),
        opts: BenchmarkOpts {
            sample_size: Some(10),
            seed: Some(9),
            format: ReportFormat::Json,
            output: Some(output.clone()),
            ..Default::default()
        },
        keep: false,
    };

    execute(opts, command).await?;

    let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(report["record_total"], 50);
    assert_eq!(report["sampled"], 10);
    assert_eq!(report["narrowed_ids"], 25);
    assert!(report["exclusion_scan"]["elapsed_secs"].as_f64().unwrap_or(-1.0) >= 0.0);
    assert!(report["id_narrowing"]["elapsed_secs"].as_f64().unwrap_or(-1.0) >= 0.0);

    Ok(())
}

#[tokio::test]
async fn test_execute_with_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("stress.toml");
    let output = dir.path().join("report.html");
    std::fs::write(
        &config_path,
        "seed = 3\n[stress]\nrecord_count = 8\n[stress.benchmark]\nsample_size = 4\n",
    )?;

    let opts = StoreOpts {
        store: StoreKind::Memory,
        mysql_connection_string: None,
        table_prefix: None,
        config: Some(config_path),
    };
    let command = Commands::Run {
        record_count: None,
        opts: BenchmarkOpts {
            output: Some(output.clone()),
            ..Default::default()
        },
        keep: false,
    };

    execute(opts, command).await?;

    let html = std::fs::read_to_string(&output)?;
    assert!(html.contains("<code>8</code> dummy records"));
    assert!(html.contains("<code>4</code> hashes"));

    Ok(())
}

#[tokio::test]
async fn test_execute_mysql_requires_connection_string() {
    let opts = StoreOpts {
        store: StoreKind::MySQL,
        mysql_connection_string: None,
        table_prefix: None,
        config: None,
    };

    let err = execute(opts, Commands::Count).await.unwrap_err();
    assert!(err.to_string().contains("MySQL connection string required"));
}
