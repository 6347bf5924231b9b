//! Outbox dispatcher service.
//!
//! The `OutboxDispatcher` is a background service that:
//! - Polls the database for deliverable intents
//! - Appends the corresponding notification rows
//! - Marks intents delivered or failed (retries via the outbox backoff)
//!
//! # Example
//!
//! ```ignore
//! let dispatcher = OutboxDispatcher::new(pool.clone());
//! tokio::spawn(dispatcher.run());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::PgPool;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::entry::OutboxEntry;
use crate::domains::notifications::Notification;

/// Configuration for the outbox dispatcher.
#[derive(Debug, Clone)]
pub struct OutboxDispatcherConfig {
    /// Maximum number of intents to claim at once
    pub batch_size: i64,
    /// How long to wait when no intents are deliverable
    pub poll_interval: Duration,
    /// Worker ID for this instance
    pub worker_id: String,
}

impl Default for OutboxDispatcherConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            poll_interval: Duration::from_secs(5),
            worker_id: format!("dispatcher-{}", Uuid::new_v4()),
        }
    }
}

impl OutboxDispatcherConfig {
    /// Create a new config with a specific worker ID.
    pub fn with_worker_id(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            ..Default::default()
        }
    }
}

/// Background service that drains the notification outbox.
///
/// The dispatcher polls for intents, appends notification rows, and updates
/// intent status. Retries are handled by `OutboxEntry::mark_failed`.
pub struct OutboxDispatcher {
    pool: PgPool,
    config: OutboxDispatcherConfig,
    shutdown: Arc<AtomicBool>,
}

impl OutboxDispatcher {
    /// Create a new dispatcher with default configuration.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            config: OutboxDispatcherConfig::default(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(pool: PgPool, config: OutboxDispatcherConfig) -> Self {
        Self {
            pool,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a shutdown handle for graceful shutdown.
    ///
    /// Call `store(true, Ordering::SeqCst)` on the returned Arc to signal
    /// shutdown.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Request shutdown of the dispatcher.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Run the dispatcher until shutdown is requested.
    pub async fn run(self) -> Result<()> {
        info!(
            worker_id = %self.config.worker_id,
            batch_size = self.config.batch_size,
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "outbox dispatcher starting"
        );

        loop {
            if self.is_shutdown_requested() {
                break;
            }

            let entries = match OutboxEntry::claim_batch(
                &self.config.worker_id,
                self.config.batch_size,
                &self.pool,
            )
            .await
            {
                Ok(entries) => entries,
                Err(e) => {
                    error!(error = %e, "failed to claim outbox entries");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            if entries.is_empty() {
                tokio::time::sleep(self.config.poll_interval).await;
                continue;
            }

            debug!(count = entries.len(), "claimed outbox entries");

            for entry in entries {
                if self.is_shutdown_requested() {
                    break;
                }

                let entry_id = entry.id;
                let kind = entry.kind;

                match self.deliver(&entry).await {
                    Ok(()) => {
                        info!(entry_id = %entry_id, kind = %kind, "notification delivered");
                        if let Err(e) = OutboxEntry::mark_delivered(entry_id, &self.pool).await {
                            error!(entry_id = %entry_id, error = %e, "failed to mark entry delivered");
                        }
                    }
                    Err(e) => {
                        warn!(entry_id = %entry_id, kind = %kind, error = %e, "delivery failed");

                        let retryable = is_retryable_error(&e);
                        if let Err(mark_err) =
                            OutboxEntry::mark_failed(entry_id, &e.to_string(), retryable, &self.pool)
                                .await
                        {
                            error!(entry_id = %entry_id, error = %mark_err, "failed to mark entry failed");
                        }
                    }
                }
            }
        }

        info!(worker_id = %self.config.worker_id, "outbox dispatcher stopped");
        Ok(())
    }

    /// Run until a shutdown signal is received.
    ///
    /// Convenience method that listens for Ctrl+C.
    pub async fn run_until_shutdown(self) -> Result<()> {
        let shutdown = self.shutdown_handle();

        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
            shutdown.store(true, Ordering::SeqCst);
        });

        self.run().await
    }

    /// Deliver one intent: append the notification row.
    ///
    /// The recipient may have no user row; notifications reference user ids
    /// by value, so the append succeeds regardless.
    async fn deliver(&self, entry: &OutboxEntry) -> Result<()> {
        Notification::append(
            entry.user_id,
            entry.kind,
            &entry.message,
            entry.reason.as_deref(),
            &self.pool,
        )
        .await?;

        Ok(())
    }
}

/// Classify a delivery error to determine retry behavior.
///
/// Malformed intents will never deliver no matter how often they are
/// retried; everything else (connection loss, timeouts) is worth another
/// attempt.
fn is_retryable_error(error: &anyhow::Error) -> bool {
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("invalid")
        || error_str.contains("deserialize")
        || error_str.contains("parse")
    {
        return false;
    }

    true
}
