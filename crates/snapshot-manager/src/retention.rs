/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Retention enforcement
//!
//! Deletes owned manual snapshots that have aged past the retention
//! window. Deletion is not transactional: a failure partway leaves
//! earlier deletes in place and surfaces the error.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    config::SnapshotPolicy,
    discovery::find_snapshots,
    error::StoreError,
    interval::TimeWindow,
    store::{SnapshotStore, SnapshotType},
};

/// Delete manual snapshots owned by this policy that are older than
/// the retention cutoff, returning how many were deleted.
///
/// Without a retention spec this is a no-op with zero store calls:
/// "retain forever" is a valid, cheap state. Deletes are issued one
/// at a time; the first failure stops further deletes and is returned
/// after that call has settled, so completion is reported exactly
/// once and never before all issued deletes have finished.
pub async fn enforce_retention(
    store: &dyn SnapshotStore,
    policy: &SnapshotPolicy,
    now: DateTime<Utc>,
) -> Result<usize, StoreError> {
    let Some(retention) = policy.retention() else {
        debug!(
            cluster = %policy.cluster_identifier,
            "no snapshot retention configured, all snapshots will be retained"
        );
        return Ok(0);
    };

    let cutoff = TimeWindow::before(retention, now);
    let aged = find_snapshots(
        store,
        &policy.cluster_identifier,
        &policy.namespace,
        cutoff,
        Some(SnapshotType::Manual),
    )
    .await?;

    if aged.is_empty() {
        debug!(cluster = %policy.cluster_identifier, "no aged snapshots to clean up");
        return Ok(0);
    }

    info!(
        cluster = %policy.cluster_identifier,
        count = aged.len(),
        "cleaning up snapshots past retention"
    );
    let mut deleted = 0;
    for snapshot in &aged {
        debug!(snapshot_id = %snapshot.id, "deleting aged snapshot");
        store
            .delete_snapshot(&snapshot.id, &policy.cluster_identifier)
            .await?;
        deleted += 1;
    }
    Ok(deleted)
}
