//! Runs the publikasi maintenance jobs until interrupted.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use publikasi_catalog::Catalog;
use publikasi_db::{log_pool_metrics, Database, FilesystemBackend, PoolConfig};
use publikasi_jobs::{
    backends_from_database, AppConfig, RetentionConfig, RetentionEvent, RetentionWorker,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: info for the publikasi crates)
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "publikasi_scheduler=info,publikasi_jobs=info,publikasi_catalog=info,publikasi_db=info"
            .into()
    });
    let registry = tracing_subscriber::registry().with(env_filter);

    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("publikasi-scheduler.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let app = AppConfig::from_env();
    let retention = RetentionConfig::from_env();

    let db = Database::connect_with_config(&app.database_url, PoolConfig::from_env()).await?;
    db.migrate().await?;
    log_pool_metrics(db.pool());

    let blobs = FilesystemBackend::new(app.file_storage_path.clone());
    if let Err(e) = blobs.validate().await {
        warn!(
            subsystem = "storage",
            path = %app.file_storage_path.display(),
            error = %e,
            "File storage is not writable"
        );
    }

    let catalog = Catalog::new(backends_from_database(&db, blobs));
    let handle = RetentionWorker::new(catalog.notifications.clone(), retention).start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    let mut events = handle.events();
    if handle.shutdown().await.is_ok() {
        // Let an in-flight pass finish before the runtime goes away
        while let Ok(event) = events.recv().await {
            if event == RetentionEvent::WorkerStopped {
                break;
            }
        }
    }

    Ok(())
}
