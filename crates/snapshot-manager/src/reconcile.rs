/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Reconciliation decision
//!
//! Pure function over the discovered snapshot set; no store access
//! happens here.

use crate::store::{SnapshotRecord, SnapshotType};

/// What the reconciler should do for the current interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No snapshot in the window: create a fresh manual snapshot
    CreateNew,
    /// Only automatic snapshots in the window: promote the newest one
    PromoteLatestAutomatic(SnapshotRecord),
    /// A manual snapshot already satisfies the interval
    NoOp,
}

/// Decide what to do given the snapshots discovered in the interval
/// window.
///
/// Any manual snapshot in the window satisfies the interval, however
/// many automatic snapshots surround it. When only automatic
/// snapshots exist, the candidate is the one with the greatest
/// `created_at`; store result order is never trusted, the set is
/// sorted explicitly first.
pub fn decide(mut records: Vec<SnapshotRecord>) -> Action {
    if records
        .iter()
        .any(|r| r.snapshot_type == SnapshotType::Manual)
    {
        return Action::NoOp;
    }

    records.sort_by_key(|r| r.created_at);
    match records.pop() {
        Some(latest) => Action::PromoteLatestAutomatic(latest),
        None => Action::CreateNew,
    }
}
