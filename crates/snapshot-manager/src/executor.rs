/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Action execution against the snapshot store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::SnapshotPolicy,
    error::{Error, Result},
    reconcile::Action,
    store::{ownership_tags, snapshot_id, SnapshotStore},
};

/// Outcome of executing an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionTaken {
    /// A fresh manual snapshot was created
    Created { snapshot_id: String },
    /// An automatic snapshot was promoted to a manual one
    Promoted {
        source_id: String,
        snapshot_id: String,
    },
    /// A manual snapshot already satisfied the interval
    AlreadySatisfied,
}

/// Apply a reconciliation decision to the store.
///
/// Promotion is two store calls with no transactionality between
/// them: a copy that succeeds followed by a tagging call that fails
/// leaves a real but unlabeled snapshot behind, reported as
/// [`Error::TagInconsistency`] rather than rolled back or swallowed.
pub async fn execute(
    store: &dyn SnapshotStore,
    action: Action,
    policy: &SnapshotPolicy,
    now: DateTime<Utc>,
) -> Result<ActionTaken> {
    let cluster = policy.cluster_identifier.as_str();
    let namespace = policy.namespace.as_str();

    match action {
        Action::CreateNew => {
            let new_id = snapshot_id(namespace, cluster, now);
            info!(cluster, snapshot_id = %new_id, "creating new manual snapshot");
            store
                .create_snapshot(cluster, &new_id, &ownership_tags(namespace, Some(now)))
                .await?;
            Ok(ActionTaken::Created { snapshot_id: new_id })
        }
        Action::PromoteLatestAutomatic(source) => {
            let new_id = snapshot_id(namespace, cluster, now);
            info!(
                cluster,
                source_id = %source.id,
                snapshot_id = %new_id,
                "promoting automatic snapshot for long term retention"
            );
            store.copy_snapshot(&source.id, &new_id).await?;
            if let Err(source) = store
                .tag_resource(&new_id, &ownership_tags(namespace, None))
                .await
            {
                return Err(Error::TagInconsistency {
                    snapshot_id: new_id,
                    source,
                });
            }
            Ok(ActionTaken::Promoted {
                source_id: source.id,
                snapshot_id: new_id,
            })
        }
        Action::NoOp => {
            info!(cluster, "manual snapshot already exists within interval");
            Ok(ActionTaken::AlreadySatisfied)
        }
    }
}
