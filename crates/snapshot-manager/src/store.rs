/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Snapshot store abstraction
//!
//! The reconciler talks to the snapshot-bearing service only through
//! the [`SnapshotStore`] trait; transport, authentication and retry
//! policy live behind it. [`MemoryStore`] is the bundled reference
//! backend and doubles as the test substitute.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    error::{StoreError, StoreOperation},
    interval::TimeWindow,
};

/// Tag key identifying the tool that created a snapshot
pub const CREATED_BY_TAG: &str = "CreatedBy";

/// Tool identity written into the `CreatedBy` tag
pub const CREATED_BY_VALUE: &str = "snapshot-manager";

/// Tag key carrying the reference time of a true creation
pub const CREATED_AT_TAG: &str = "CreatedAt";

/// Tag key scoping snapshots to one policy namespace
pub const NAMESPACE_TAG: &str = "Namespace";

/// Timestamp format used in snapshot identifiers and `CreatedAt` tags
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// Snapshot kind as reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotType {
    /// Provider-managed snapshot outside this tool's control
    Automatic,
    /// Durable, retention-managed snapshot
    Manual,
}

/// A snapshot as described by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: String,
    pub snapshot_type: SnapshotType,
    pub created_at: DateTime<Utc>,
    pub tags: HashMap<String, String>,
}

impl SnapshotRecord {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Query criteria for [`SnapshotStore::describe_snapshots`].
///
/// Only constructible through [`SnapshotFilter::owned_by`], so every
/// query carries the namespace ownership tag pair: snapshots lacking
/// the tag stay invisible to this tool even on the same cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFilter {
    pub tag_key: String,
    pub tag_value: String,
    pub window: TimeWindow,
    pub snapshot_type: Option<SnapshotType>,
}

impl SnapshotFilter {
    /// Filter scoped to snapshots owned by `namespace`
    pub fn owned_by(namespace: &str) -> Self {
        Self {
            tag_key: NAMESPACE_TAG.to_string(),
            tag_value: namespace.to_string(),
            window: TimeWindow::default(),
            snapshot_type: None,
        }
    }

    pub fn within(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn of_type(mut self, snapshot_type: SnapshotType) -> Self {
        self.snapshot_type = Some(snapshot_type);
        self
    }

    /// Whether a record satisfies the filter; this is the contract
    /// every backend must honor and the one [`MemoryStore`] applies.
    pub fn matches(&self, record: &SnapshotRecord) -> bool {
        record.tag(&self.tag_key) == Some(self.tag_value.as_str())
            && self.window.contains(record.created_at)
            && self
                .snapshot_type
                .map_or(true, |wanted| record.snapshot_type == wanted)
    }
}

/// Abstract snapshot store the reconciler depends on.
///
/// Every call either succeeds or fails with a [`StoreError`]; the
/// reconciler does not interpret error subtypes and never retries.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// List snapshots of a cluster matching the filter. Result order
    /// is unspecified; callers needing "latest" must sort.
    async fn describe_snapshots(
        &self,
        cluster: &str,
        filter: &SnapshotFilter,
    ) -> Result<Vec<SnapshotRecord>, StoreError>;

    /// Create a new manual snapshot of a cluster
    async fn create_snapshot(
        &self,
        cluster: &str,
        snapshot_id: &str,
        tags: &HashMap<String, String>,
    ) -> Result<SnapshotRecord, StoreError>;

    /// Copy an existing snapshot to a new manual snapshot. Tags are
    /// not carried over; the caller tags the copy separately.
    async fn copy_snapshot(
        &self,
        source_id: &str,
        target_id: &str,
    ) -> Result<SnapshotRecord, StoreError>;

    /// Attach tags to an existing snapshot
    async fn tag_resource(
        &self,
        snapshot_id: &str,
        tags: &HashMap<String, String>,
    ) -> Result<(), StoreError>;

    /// Delete a manual snapshot of a cluster
    async fn delete_snapshot(&self, snapshot_id: &str, cluster: &str)
        -> Result<(), StoreError>;
}

/// Deterministic manual snapshot identifier:
/// `{namespace}-{cluster}-{timestamp}`. Uniqueness beyond timestamp
/// granularity is not required; the interval check prevents
/// re-creation within a window.
pub fn snapshot_id(namespace: &str, cluster: &str, at: DateTime<Utc>) -> String {
    format!("{namespace}-{cluster}-{}", at.format(TIMESTAMP_FORMAT))
}

/// Ownership tag set for manual snapshots.
///
/// `created_at` is supplied only for true creations; promotions omit
/// it so the promoted snapshot's authoritative creation time stays the
/// original automatic snapshot's, not the promotion time.
pub fn ownership_tags(
    namespace: &str,
    created_at: Option<DateTime<Utc>>,
) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    tags.insert(CREATED_BY_TAG.to_string(), CREATED_BY_VALUE.to_string());
    tags.insert(NAMESPACE_TAG.to_string(), namespace.to_string());
    if let Some(at) = created_at {
        tags.insert(
            CREATED_AT_TAG.to_string(),
            at.format(TIMESTAMP_FORMAT).to_string(),
        );
    }
    tags
}

/// In-memory snapshot store backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<SnapshotRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-existing snapshots
    pub async fn insert(&self, record: SnapshotRecord) {
        self.records.write().await.push(record);
    }

    /// Snapshot of the store contents, for inspection
    pub async fn records(&self) -> Vec<SnapshotRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn describe_snapshots(
        &self,
        _cluster: &str,
        filter: &SnapshotFilter,
    ) -> Result<Vec<SnapshotRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn create_snapshot(
        &self,
        _cluster: &str,
        snapshot_id: &str,
        tags: &HashMap<String, String>,
    ) -> Result<SnapshotRecord, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == snapshot_id) {
            return Err(StoreError::new(
                StoreOperation::CreateSnapshot,
                format!("snapshot {snapshot_id} already exists"),
            ));
        }
        let record = SnapshotRecord {
            id: snapshot_id.to_string(),
            snapshot_type: SnapshotType::Manual,
            created_at: Utc::now(),
            tags: tags.clone(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn copy_snapshot(
        &self,
        source_id: &str,
        target_id: &str,
    ) -> Result<SnapshotRecord, StoreError> {
        let mut records = self.records.write().await;
        let source = records
            .iter()
            .find(|r| r.id == source_id)
            .ok_or_else(|| {
                StoreError::new(
                    StoreOperation::CopySnapshot,
                    format!("source snapshot {source_id} not found"),
                )
            })?;
        // The copy keeps the source's creation time but starts untagged.
        let record = SnapshotRecord {
            id: target_id.to_string(),
            snapshot_type: SnapshotType::Manual,
            created_at: source.created_at,
            tags: HashMap::new(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn tag_resource(
        &self,
        snapshot_id: &str,
        tags: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == snapshot_id)
            .ok_or_else(|| {
                StoreError::new(
                    StoreOperation::TagResource,
                    format!("snapshot {snapshot_id} not found"),
                )
            })?;
        record.tags.extend(tags.clone());
        Ok(())
    }

    async fn delete_snapshot(
        &self,
        snapshot_id: &str,
        _cluster: &str,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != snapshot_id);
        if records.len() == before {
            return Err(StoreError::new(
                StoreOperation::DeleteSnapshot,
                format!("snapshot {snapshot_id} not found"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(id: &str, snapshot_type: SnapshotType, namespace: &str) -> SnapshotRecord {
        SnapshotRecord {
            id: id.to_string(),
            snapshot_type,
            created_at: Utc::now(),
            tags: HashMap::from([(NAMESPACE_TAG.to_string(), namespace.to_string())]),
        }
    }

    #[test]
    fn snapshot_id_is_deterministic() {
        let at = DateTime::parse_from_rfc3339("2025-06-01T09:30:00Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        assert_eq!(
            snapshot_id("prod", "orders-cluster", at),
            "prod-orders-cluster-2025-06-01-09-30"
        );
    }

    #[test]
    fn creation_tags_carry_created_at_but_promotion_tags_do_not() {
        let now = Utc::now();
        let created = ownership_tags("prod", Some(now));
        assert_eq!(created.get(CREATED_BY_TAG).map(String::as_str), Some(CREATED_BY_VALUE));
        assert_eq!(created.get(NAMESPACE_TAG).map(String::as_str), Some("prod"));
        assert!(created.contains_key(CREATED_AT_TAG));

        let promoted = ownership_tags("prod", None);
        assert!(!promoted.contains_key(CREATED_AT_TAG));
        assert_eq!(promoted.get(NAMESPACE_TAG).map(String::as_str), Some("prod"));
    }

    #[test]
    fn filter_requires_namespace_tag_match() {
        let filter = SnapshotFilter::owned_by("prod");
        assert!(filter.matches(&record("a", SnapshotType::Manual, "prod")));
        assert!(!filter.matches(&record("b", SnapshotType::Manual, "staging")));

        let untagged = SnapshotRecord {
            tags: HashMap::new(),
            ..record("c", SnapshotType::Manual, "prod")
        };
        assert!(!filter.matches(&untagged));
    }

    #[test]
    fn filter_applies_window_and_type() {
        let now = Utc::now();
        let mut old = record("old", SnapshotType::Manual, "prod");
        old.created_at = now - Duration::days(10);

        let recent_only =
            SnapshotFilter::owned_by("prod").within(TimeWindow {
                start: Some(now - Duration::days(1)),
                end: None,
            });
        assert!(!recent_only.matches(&old));

        let manual_only = SnapshotFilter::owned_by("prod").of_type(SnapshotType::Manual);
        assert!(manual_only.matches(&record("m", SnapshotType::Manual, "prod")));
        assert!(!manual_only.matches(&record("a", SnapshotType::Automatic, "prod")));
    }

    #[tokio::test]
    async fn memory_store_round_trips_create_and_delete() {
        let store = MemoryStore::new();
        let tags = ownership_tags("prod", Some(Utc::now()));
        store
            .create_snapshot("orders-cluster", "prod-orders-1", &tags)
            .await
            .expect("create");

        let found = store
            .describe_snapshots("orders-cluster", &SnapshotFilter::owned_by("prod"))
            .await
            .expect("describe");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "prod-orders-1");

        store
            .delete_snapshot("prod-orders-1", "orders-cluster")
            .await
            .expect("delete");
        assert!(store.records().await.is_empty());
    }

    #[tokio::test]
    async fn memory_store_copy_keeps_source_creation_time_and_drops_tags() {
        let store = MemoryStore::new();
        let mut source = record("auto-1", SnapshotType::Automatic, "prod");
        source.created_at = Utc::now() - Duration::hours(2);
        store.insert(source.clone()).await;

        let copy = store
            .copy_snapshot("auto-1", "prod-orders-2")
            .await
            .expect("copy");
        assert_eq!(copy.snapshot_type, SnapshotType::Manual);
        assert_eq!(copy.created_at, source.created_at);
        assert!(copy.tags.is_empty());
    }

    #[tokio::test]
    async fn memory_store_rejects_unknown_ids() {
        let store = MemoryStore::new();
        assert!(store.copy_snapshot("missing", "target").await.is_err());
        assert!(store.tag_resource("missing", &HashMap::new()).await.is_err());
        assert!(store.delete_snapshot("missing", "c").await.is_err());
    }
}
