//! Recurring purge of old notifications.

use std::time::Instant;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, instrument};

use publikasi_catalog::NotificationService;
use publikasi_core::{defaults, Error, Result};

use crate::config::RetentionConfig;

/// Event emitted by the retention worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionEvent {
    WorkerStarted,
    /// A purge pass finished.
    PurgeCompleted {
        cutoff: DateTime<Utc>,
        deleted: u64,
    },
    /// A purge pass failed; the loop keeps running.
    PurgeFailed { error: String },
    WorkerStopped,
}

/// Handle for controlling a running worker.
pub struct WorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    event_rx: broadcast::Receiver<RetentionEvent>,
}

impl WorkerHandle {
    /// Signal the worker to stop after the current pass.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| Error::Internal("Failed to send shutdown signal".into()))
    }

    pub fn events(&self) -> broadcast::Receiver<RetentionEvent> {
        self.event_rx.resubscribe()
    }
}

/// Deletes notifications past the retention window on a fixed interval.
pub struct RetentionWorker {
    notifications: NotificationService,
    config: RetentionConfig,
    event_tx: broadcast::Sender<RetentionEvent>,
}

impl RetentionWorker {
    pub fn new(notifications: NotificationService, config: RetentionConfig) -> Self {
        let (event_tx, _) = broadcast::channel(defaults::EVENT_BUS_CAPACITY);
        Self {
            notifications,
            config,
            event_tx,
        }
    }

    /// Oldest creation time that survives a pass run at `now`. None when the
    /// window reaches past the representable date range.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        ChronoDuration::try_days(self.config.retention_days)
            .and_then(|window| now.checked_sub_signed(window))
    }

    /// One purge pass relative to `now`. Errors are logged and reported as
    /// an event, never returned.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Option<u64> {
        let start = Instant::now();
        let Some(cutoff) = self.cutoff(now) else {
            let e = Error::Config(format!(
                "retention window of {} days is out of range",
                self.config.retention_days
            ));
            return self.report_failure(e);
        };

        match self.notifications.purge_older_than(cutoff).await {
            Ok(deleted) => {
                info!(
                    subsystem = "jobs",
                    component = "retention",
                    op = "purge",
                    deleted_count = deleted,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Retention pass complete"
                );
                let _ = self
                    .event_tx
                    .send(RetentionEvent::PurgeCompleted { cutoff, deleted });
                Some(deleted)
            }
            Err(e) => self.report_failure(e),
        }
    }

    fn report_failure(&self, e: Error) -> Option<u64> {
        error!(
            subsystem = "jobs",
            component = "retention",
            op = "purge",
            error = %e,
            "Retention pass failed"
        );
        let _ = self.event_tx.send(RetentionEvent::PurgeFailed {
            error: e.to_string(),
        });
        None
    }

    /// Start the loop and return a handle for control.
    pub fn start(self) -> WorkerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let event_rx = self.event_tx.subscribe();

        tokio::spawn(async move {
            self.run(&mut shutdown_rx).await;
        });

        WorkerHandle {
            shutdown_tx,
            event_rx,
        }
    }

    /// First pass runs immediately, then once per interval.
    #[instrument(skip(self, shutdown_rx))]
    async fn run(&self, shutdown_rx: &mut mpsc::Receiver<()>) {
        if !self.config.enabled {
            info!("Retention worker is disabled, not starting");
            return;
        }

        info!(
            retention_days = self.config.retention_days,
            interval_secs = self.config.interval.as_secs(),
            "Retention worker started"
        );
        let _ = self.event_tx.send(RetentionEvent::WorkerStarted);

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Retention worker received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_once(Utc::now()).await;
                }
            }
        }

        let _ = self.event_tx.send(RetentionEvent::WorkerStopped);
        info!("Retention worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use publikasi_catalog::memory::MemoryStore;
    use std::sync::Arc;

    fn worker(store: &MemoryStore, config: RetentionConfig) -> RetentionWorker {
        RetentionWorker::new(NotificationService::new(Arc::new(store.clone())), config)
    }

    #[test]
    fn test_cutoff_uses_retention_days() {
        let store = MemoryStore::new();
        let worker = worker(&store, RetentionConfig::default().with_retention_days(3));
        let now = Utc.with_ymd_and_hms(2026, 10, 10, 12, 0, 0).unwrap();
        assert_eq!(
            worker.cutoff(now),
            Some(Utc.with_ymd_and_hms(2026, 10, 7, 12, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_out_of_range_window_fails_the_pass() {
        let store = MemoryStore::new();
        let config = RetentionConfig {
            retention_days: i64::MAX,
            ..RetentionConfig::default()
        };
        let worker = worker(&store, config);
        let mut events = worker.event_tx.subscribe();

        assert_eq!(worker.cutoff(Utc::now()), None);
        assert_eq!(worker.run_once(Utc::now()).await, None);
        assert!(matches!(
            events.recv().await.unwrap(),
            RetentionEvent::PurgeFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_pass_reports_completion_event() {
        let store = MemoryStore::new();
        let worker = worker(&store, RetentionConfig::default());
        let mut events = worker.event_tx.subscribe();

        assert_eq!(worker.run_once(Utc::now()).await, Some(0));
        assert!(matches!(
            events.recv().await.unwrap(),
            RetentionEvent::PurgeCompleted { deleted: 0, .. }
        ));
    }
}
