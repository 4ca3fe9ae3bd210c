/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Snapshot discovery

use tracing::debug;

use crate::{
    error::StoreError,
    interval::TimeWindow,
    store::{SnapshotFilter, SnapshotRecord, SnapshotStore, SnapshotType},
};

/// Query the store for snapshots of a cluster owned by `namespace`,
/// optionally bounded by a time window and restricted to one type.
///
/// The result is returned raw: unsorted, undeduped, with any store
/// failure passed through verbatim. Callers apply their own ordering
/// and selection; retries, if any, belong to the store implementation.
pub async fn find_snapshots(
    store: &dyn SnapshotStore,
    cluster: &str,
    namespace: &str,
    window: TimeWindow,
    type_filter: Option<SnapshotType>,
) -> Result<Vec<SnapshotRecord>, StoreError> {
    let mut filter = SnapshotFilter::owned_by(namespace).within(window);
    if let Some(snapshot_type) = type_filter {
        filter = filter.of_type(snapshot_type);
    }

    let snapshots = store.describe_snapshots(cluster, &filter).await?;
    debug!(
        cluster,
        namespace,
        count = snapshots.len(),
        "resolved snapshots from store"
    );
    Ok(snapshots)
}
