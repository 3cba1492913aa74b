//! Retention enforcement for the audit log
//!
//! Events older than the retention window are counted on every sweep and
//! deleted unless `dry_run` is set.

use crate::AuditError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use spontaneity_domain::traits::AuditLogStore;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Configuration for audit retention
///
/// # Examples
///
/// ```
/// use spontaneity_audit::RetentionConfig;
///
/// let config = RetentionConfig::default();
/// assert_eq!(config.retention_days, 90);
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Events older than this many days are expired
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// How often the worker sweeps (in minutes)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,

    /// Count expired events without deleting them
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
}

fn default_retention_days() -> u32 {
    90
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_dry_run() -> bool {
    true
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            sweep_interval_minutes: default_sweep_interval(),
            dry_run: default_dry_run(),
        }
    }
}

/// Longest accepted retention window (100 years)
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// Longest accepted sweep interval (one week)
pub const MAX_SWEEP_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

impl RetentionConfig {
    /// Sweep interval as Duration
    ///
    /// Values outside `1..=MAX_SWEEP_INTERVAL_MINUTES` are clamped into range.
    pub fn sweep_interval(&self) -> Duration {
        let minutes = self
            .sweep_interval_minutes
            .clamp(1, MAX_SWEEP_INTERVAL_MINUTES);
        minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(MAX_SWEEP_INTERVAL_MINUTES * 60))
    }

    /// Oldest timestamp that is still retained at `now`
    ///
    /// A window reaching past the earliest representable time yields that time,
    /// so nothing is expired.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(ChronoDuration::days(i64::from(self.retention_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.retention_days == 0 {
            return Err("retention_days must be greater than 0".to_string());
        }
        if self.retention_days > MAX_RETENTION_DAYS {
            return Err(format!("retention_days cannot exceed {}", MAX_RETENTION_DAYS));
        }
        if self.sweep_interval_minutes == 0 {
            return Err("sweep_interval_minutes must be greater than 0".to_string());
        }
        if self.sweep_interval_minutes > MAX_SWEEP_INTERVAL_MINUTES {
            return Err(format!(
                "sweep_interval_minutes cannot exceed {}",
                MAX_SWEEP_INTERVAL_MINUTES
            ));
        }
        Ok(())
    }
}

/// Result of one sweep
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionReport {
    /// Events older than this were targeted
    pub cutoff: DateTime<Utc>,
    /// Events past the cutoff
    pub expired: usize,
    /// Events actually removed (0 in dry-run mode)
    pub deleted: usize,
    /// Whether the sweep ran in dry-run mode
    pub dry_run: bool,
}

/// Running totals across sweeps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionMetrics {
    /// Sweeps completed
    pub sweep_count: usize,
    /// Events found past the cutoff, summed over sweeps
    pub total_expired: usize,
    /// Events deleted, summed over sweeps
    pub total_deleted: usize,
}

/// Applies the retention window to a store
pub struct RetentionSweeper {
    config: RetentionConfig,
    metrics: RetentionMetrics,
}

impl RetentionSweeper {
    /// Create a sweeper
    pub fn new(config: RetentionConfig) -> Self {
        Self {
            config,
            metrics: RetentionMetrics::default(),
        }
    }

    /// Totals so far
    pub fn metrics(&self) -> &RetentionMetrics {
        &self.metrics
    }

    /// Sweep relative to the current time
    pub fn sweep<S>(&mut self, store: &S) -> Result<RetentionReport, AuditError>
    where
        S: AuditLogStore,
        S::Error: Display,
    {
        self.sweep_at(store, Utc::now())
    }

    /// Sweep relative to `now`
    pub fn sweep_at<S>(&mut self, store: &S, now: DateTime<Utc>) -> Result<RetentionReport, AuditError>
    where
        S: AuditLogStore,
        S::Error: Display,
    {
        let cutoff = self.config.cutoff(now);

        let expired = store
            .count_older_than(cutoff)
            .map_err(|e| AuditError::Store(e.to_string()))?;

        let deleted = if self.config.dry_run || expired == 0 {
            0
        } else {
            store
                .delete_older_than(cutoff)
                .map_err(|e| AuditError::Store(e.to_string()))?
        };

        self.metrics.sweep_count += 1;
        self.metrics.total_expired += expired;
        self.metrics.total_deleted += deleted;

        Ok(RetentionReport {
            cutoff,
            expired,
            deleted,
            dry_run: self.config.dry_run,
        })
    }
}

/// Shortest tick accepted by `tokio::time::interval`
const MIN_WORKER_INTERVAL: Duration = Duration::from_millis(1);

/// Background worker that runs the sweeper on a schedule
pub struct RetentionWorker {
    sweeper: RetentionSweeper,
    interval: Duration,
}

impl RetentionWorker {
    /// Create a worker from configuration
    pub fn new(config: RetentionConfig) -> Self {
        let interval = config.sweep_interval();
        Self {
            sweeper: RetentionSweeper::new(config),
            interval,
        }
    }

    /// Override the sweep interval (a zero interval becomes one millisecond)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_WORKER_INTERVAL);
        self
    }

    /// Totals so far
    pub fn metrics(&self) -> &RetentionMetrics {
        self.sweeper.metrics()
    }

    /// Sweep on every tick until `shutdown` resolves
    ///
    /// Sweep failures are logged and the worker keeps running.
    pub async fn run_until<S, F>(&mut self, store: Arc<S>, shutdown: F)
    where
        S: AuditLogStore,
        S::Error: Display,
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.interval);
        tokio::pin!(shutdown);

        tracing::info!("Retention worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep_once(store.as_ref()),
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping retention worker");
                    break;
                }
            }
        }

        tracing::info!(
            "Retention worker stopped after {} sweeps ({} deleted)",
            self.metrics().sweep_count,
            self.metrics().total_deleted
        );
    }

    /// Run a fixed number of sweeps (useful for testing)
    pub async fn run_cycles<S>(&mut self, store: Arc<S>, cycles: usize)
    where
        S: AuditLogStore,
        S::Error: Display,
    {
        let mut ticker = interval(self.interval);
        for _ in 0..cycles {
            ticker.tick().await;
            self.sweep_once(store.as_ref());
        }
    }

    fn sweep_once<S>(&mut self, store: &S)
    where
        S: AuditLogStore,
        S::Error: Display,
    {
        match self.sweeper.sweep(store) {
            Ok(report) => tracing::info!(
                expired = report.expired,
                deleted = report.deleted,
                dry_run = report.dry_run,
                "Retention sweep completed"
            ),
            Err(e) => tracing::error!("Retention sweep failed: {}", e),
        }
    }
}
