use prism_daemon::background::{reload_filters, start_recording};
use prism_daemon::config::ConfigError;
use prism_daemon::feed::ingest_lines;
use prism_db::{create_migrated_pool, DbRuntimeSettings};
use prism_filter::{FilterHandle, FilterList};
use prism_queue::{count_records, recent_records, QueueSettings};
use tokio::sync::mpsc;

fn join_line(name: &str, n: u128) -> String {
    format!(
        r#"{{"event":"player-join","player":{{"uuid":"{}","name":"{name}"}}}}"#,
        uuid::Uuid::from_u128(n)
    )
}

#[tokio::test]
async fn feed_lines_end_up_in_the_records_table() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("prism.db");
    let pool = create_migrated_pool(
        path.to_str().expect("temp path should be utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("failed to create pool");

    let (queue, drain) = start_recording(pool.clone(), QueueSettings::default());
    let filters = FilterHandle::new(FilterList::permissive());

    let (tx, rx) = mpsc::channel(16);
    for n in 0..10 {
        tx.send(join_line(&format!("player{n}"), n))
            .await
            .expect("send");
    }
    tx.send(r#"{"event":"player-join"}"#.to_string())
        .await
        .expect("send");
    drop(tx);

    let stats = ingest_lines(rx, &filters, &queue).await;
    assert_eq!(stats.queued, 10);
    assert_eq!(stats.rejected, 1);

    drop(queue);
    let report = drain.await.expect("drain task should not panic");
    assert_eq!(report.persisted, 10);

    let conn = pool.get().expect("failed to get connection");
    assert_eq!(count_records(&conn).expect("count"), 10);
    let newest = recent_records(&conn, 1).expect("query");
    assert_eq!(newest[0].event_name, "player-join");
    assert_eq!(
        newest[0].player.as_deref(),
        Some(uuid::Uuid::from_u128(9).to_string().as_str())
    );
}

#[test]
fn reload_installs_filters_from_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("prism.toml");
    std::fs::write(
        &path,
        r#"
        [filters.sources]
        deny = ["Griefer"]
        "#,
    )
    .expect("failed to write config");

    let filters = FilterHandle::new(FilterList::permissive());
    reload_filters(path.to_str(), &filters).expect("reload should succeed");
    assert!(!filters.snapshot().allows_source("griefer"));
}

#[test]
fn failed_reload_keeps_current_filters() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("prism.toml");
    std::fs::write(
        &path,
        r#"
        [filters.blocks]
        deny = ["  "]
        "#,
    )
    .expect("failed to write config");

    let filters = FilterHandle::new(FilterList::permissive());
    let err = reload_filters(path.to_str(), &filters).expect_err("blank entry should fail");
    assert!(matches!(err, ConfigError::Filters(_)));
    assert!(filters.snapshot().allows_block(Some("minecraft:stone")));
}
