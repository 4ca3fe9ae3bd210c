/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Error types for snapshot reconciliation

use std::fmt;

use thiserror::Error;

/// Result type for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level reconciler errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("snapshot store error: {0}")]
    Store(#[from] StoreError),

    /// Promotion copied the snapshot but the follow-up tagging call
    /// failed. The snapshot exists in the store without its ownership
    /// tags, so it is invisible to discovery and retention until
    /// re-tagged.
    #[error("snapshot {snapshot_id} was promoted but tagging failed: {source}")]
    TagInconsistency {
        snapshot_id: String,
        #[source]
        source: StoreError,
    },
}

/// Policy validation errors, each naming the offending field.
///
/// These are always produced before any store call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("clusterIdentifier must be provided")]
    MissingClusterIdentifier,

    #[error("namespace must be provided and non-empty")]
    MissingNamespace,

    #[error("snapshotInterval or snapshotIntervalHours must be provided")]
    MissingInterval,

    #[error("snapshotInterval duration must be positive")]
    InvalidInterval,

    #[error("snapshotRetention duration must be positive")]
    InvalidRetention,
}

/// A failed snapshot store call, wrapped verbatim.
///
/// The reconciler does not interpret store failures beyond which
/// operation produced them; retry policy belongs to the caller.
#[derive(Error, Debug, Clone)]
#[error("{operation} failed: {message}")]
pub struct StoreError {
    pub operation: StoreOperation,
    pub message: String,
}

impl StoreError {
    pub fn new(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Store operation that produced a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    DescribeSnapshots,
    CreateSnapshot,
    CopySnapshot,
    TagResource,
    DeleteSnapshot,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreOperation::DescribeSnapshots => "describe_snapshots",
            StoreOperation::CreateSnapshot => "create_snapshot",
            StoreOperation::CopySnapshot => "copy_snapshot",
            StoreOperation::TagResource => "tag_resource",
            StoreOperation::DeleteSnapshot => "delete_snapshot",
        })
    }
}
