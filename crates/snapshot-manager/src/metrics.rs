/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Run statistics for the reconciler service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{executor::ActionTaken, RunSummary};

/// Accumulated statistics across reconciliation runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceMetrics {
    pub total_runs: u64,
    pub failed_runs: u64,
    pub snapshots_created: u64,
    pub snapshots_promoted: u64,
    pub runs_already_satisfied: u64,
    pub snapshots_pruned: u64,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_action: Option<String>,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful run
    pub fn record_run(&mut self, summary: &RunSummary) {
        self.total_runs += 1;
        match &summary.action {
            ActionTaken::Created { .. } => {
                self.snapshots_created += 1;
                self.last_action = Some("created".to_string());
            }
            ActionTaken::Promoted { .. } => {
                self.snapshots_promoted += 1;
                self.last_action = Some("promoted".to_string());
            }
            ActionTaken::AlreadySatisfied => {
                self.runs_already_satisfied += 1;
                self.last_action = Some("already-satisfied".to_string());
            }
        }
        self.snapshots_pruned += summary.snapshots_pruned as u64;
        self.last_run_at = Some(Utc::now());
    }

    /// Record a failed run
    pub fn record_failure(&mut self) {
        self.total_runs += 1;
        self.failed_runs += 1;
        self.last_run_at = Some(Utc::now());
    }
}
