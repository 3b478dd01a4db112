//! Prism daemon binary, the host for the recording pipeline.
//!
//! Reads JSON-lines events from stdin, records them through the filters and
//! the queue, and shuts down cleanly on EOF, SIGTERM or SIGINT.

use std::io::BufRead;

use prism_daemon::{background, config, feed};
use prism_filter::FilterHandle;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "prism.toml";

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("PRISM_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

/// Forwards stdin lines from a plain thread so a blocked read never holds
/// up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1024);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to read event feed");
                    break;
                }
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = config::load_config(Some(&selected_config_path))
        .expect("failed to load configuration: the daemon cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::info!(
        source = config_source,
        path = %selected_config_path,
        "resolved startup configuration path"
    );

    // Initialize database
    let pool = prism_db::create_migrated_pool(
        &config.database.path,
        config.database.runtime_settings(),
    )
    .expect("failed to create database pool: check database.path in config");

    let filters = FilterHandle::new(
        config
            .filters
            .compile()
            .expect("failed to compile filters: check the [filters] table in config"),
    );

    let (queue, drain) = background::start_recording(pool, config.queue.settings());
    tokio::spawn(background::start_reload_task(
        Some(selected_config_path),
        filters.clone(),
    ));

    tracing::info!(db = %config.database.path, "prism daemon recording");

    let lines = spawn_stdin_reader();
    tokio::select! {
        _ = feed::ingest_lines(lines, &filters, &queue) => {}
        () = shutdown_signal() => {}
    }

    let stats = queue.stats();
    drop(queue);
    match drain.await {
        Ok(report) => tracing::info!(
            accepted = stats.accepted,
            dropped_at_intake = stats.dropped,
            persisted = report.persisted,
            dropped_on_write = report.dropped,
            "prism daemon shut down"
        ),
        Err(e) => tracing::error!(error = %e, "drain task panicked during shutdown"),
    }
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
