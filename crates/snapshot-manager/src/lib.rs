/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! # Snapshot Manager
//!
//! Snapshot lifecycle reconciler for managed database clusters:
//!
//! - Decides per interval whether a durable manual snapshot already
//!   exists, and creates or promotes one if not
//! - Prunes owned manual snapshots aged past a retention window
//! - Scopes every store operation to a policy namespace for
//!   multi-tenant isolation on shared clusters
//! - Re-derives every decision from current store contents; no job
//!   state persists between runs
//!
//! The snapshot-bearing service is abstracted behind the
//! [`SnapshotStore`] trait; this crate never embeds transport,
//! authentication, or retry logic.

pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod interval;
pub mod metrics;
pub mod reconcile;
pub mod retention;
pub mod store;

pub use config::SnapshotPolicy;
pub use error::{ConfigError, Error, Result, StoreError};
pub use executor::ActionTaken;
pub use interval::{IntervalSpec, IntervalUnit, TimeWindow};
pub use metrics::ServiceMetrics;
pub use reconcile::Action;
pub use store::{MemoryStore, SnapshotRecord, SnapshotStore, SnapshotType};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Outcome of one full reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub namespace: String,
    pub cluster_identifier: String,
    pub action: ActionTaken,
    pub snapshots_pruned: usize,
}

/// Sequential reconciliation pipeline for one policy.
///
/// Phases run strictly in order — validate, resolve the interval
/// window, discover, decide, execute, enforce retention — and the
/// first failure aborts the rest and propagates as-is.
pub struct Reconciler {
    policy: SnapshotPolicy,
    store: Arc<dyn SnapshotStore>,
}

impl Reconciler {
    pub fn new(policy: SnapshotPolicy, store: Arc<dyn SnapshotStore>) -> Self {
        Self { policy, store }
    }

    pub fn policy(&self) -> &SnapshotPolicy {
        &self.policy
    }

    /// Run the pipeline once against the current time
    pub async fn run(&self) -> Result<RunSummary> {
        self.run_at(Utc::now()).await
    }

    /// Run the pipeline once against an explicit reference time.
    ///
    /// The same instant anchors the interval window, the generated
    /// snapshot identifier, and the retention cutoff.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        self.policy.validate()?;
        let cluster = self.policy.cluster_identifier.as_str();
        let namespace = self.policy.namespace.as_str();

        // validate() guarantees an interval is present
        let interval = self
            .policy
            .interval()
            .ok_or(ConfigError::MissingInterval)?;
        let window = TimeWindow::since(interval, now);
        info!(
            cluster,
            namespace,
            since = %window.start.unwrap_or(now),
            "requesting snapshots within interval"
        );

        let snapshots = discovery::find_snapshots(
            self.store.as_ref(),
            cluster,
            namespace,
            window,
            None,
        )
        .await?;

        let action = reconcile::decide(snapshots);
        let taken = executor::execute(self.store.as_ref(), action, &self.policy, now).await?;

        let pruned = retention::enforce_retention(self.store.as_ref(), &self.policy, now).await?;

        Ok(RunSummary {
            namespace: namespace.to_string(),
            cluster_identifier: cluster.to_string(),
            action: taken,
            snapshots_pruned: pruned,
        })
    }
}

/// Snapshot manager service facade
#[derive(Clone)]
pub struct SnapshotManagerService {
    inner: Arc<SnapshotManagerServiceInner>,
}

struct SnapshotManagerServiceInner {
    reconciler: Reconciler,
    metrics: RwLock<ServiceMetrics>,
}

impl SnapshotManagerService {
    /// Create a new service for one policy, validating it eagerly so
    /// a bad configuration fails at construction rather than on the
    /// first triggered run.
    pub fn new(policy: SnapshotPolicy, store: Arc<dyn SnapshotStore>) -> Result<Self> {
        policy.validate()?;
        info!(
            cluster = %policy.cluster_identifier,
            namespace = %policy.namespace,
            "initializing snapshot manager service"
        );
        Ok(Self {
            inner: Arc::new(SnapshotManagerServiceInner {
                reconciler: Reconciler::new(policy, store),
                metrics: RwLock::new(ServiceMetrics::new()),
            }),
        })
    }

    /// Run one reconciliation pass and record its outcome
    pub async fn run(&self) -> Result<RunSummary> {
        let result = self.inner.reconciler.run().await;

        let mut metrics = self.inner.metrics.write().await;
        match &result {
            Ok(summary) => {
                metrics.record_run(summary);
                info!(
                    cluster = %summary.cluster_identifier,
                    action = ?summary.action,
                    pruned = summary.snapshots_pruned,
                    "reconciliation run completed"
                );
            }
            Err(err) => {
                metrics.record_failure();
                warn!(error = %err, "reconciliation run failed");
            }
        }
        result
    }

    /// Current accumulated run statistics
    pub async fn metrics(&self) -> ServiceMetrics {
        self.inner.metrics.read().await.clone()
    }
}
