/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Retention policy configuration
//!
//! Policies arrive as JSON in the same shape the scheduled trigger
//! delivers them: `namespace`, `clusterIdentifier`, and either the
//! generalized `snapshotInterval`/`snapshotRetention` duration+units
//! objects or the legacy `snapshotIntervalHours`/`snapshotRetentionDays`
//! counts. The legacy fields are parse-time aliases, normalized into
//! [`IntervalSpec`] before any other component sees them.

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    interval::IntervalSpec,
};

/// Retention policy for one managed cluster, immutable per run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPolicy {
    /// Tenant/tool ownership key scoping all tag lookups
    #[serde(default)]
    pub namespace: String,

    /// Identifier of the managed cluster
    #[serde(default)]
    pub cluster_identifier: String,

    /// Lookback window for deciding whether a recent manual snapshot
    /// already satisfies the policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_interval: Option<IntervalSpec>,

    /// Legacy hour-count form of `snapshotInterval`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_interval_hours: Option<u32>,

    /// Age threshold beyond which owned manual snapshots are deleted;
    /// absent means retain forever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_retention: Option<IntervalSpec>,

    /// Legacy day-count form of `snapshotRetention`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_retention_days: Option<u32>,
}

impl SnapshotPolicy {
    pub fn new(
        namespace: impl Into<String>,
        cluster_identifier: impl Into<String>,
        interval: IntervalSpec,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            cluster_identifier: cluster_identifier.into(),
            snapshot_interval: Some(interval),
            snapshot_interval_hours: None,
            snapshot_retention: None,
            snapshot_retention_days: None,
        }
    }

    pub fn with_retention(mut self, retention: IntervalSpec) -> Self {
        self.snapshot_retention = Some(retention);
        self
    }

    /// Parse a policy from its JSON event shape
    pub fn from_json(event: &str) -> serde_json::Result<Self> {
        serde_json::from_str(event)
    }

    /// The normalized interval spec; the generalized form wins over
    /// the legacy hour count when both are present.
    pub fn interval(&self) -> Option<IntervalSpec> {
        self.snapshot_interval
            .or_else(|| self.snapshot_interval_hours.map(IntervalSpec::hours))
    }

    /// The normalized retention spec, if any retention is configured
    pub fn retention(&self) -> Option<IntervalSpec> {
        self.snapshot_retention
            .or_else(|| self.snapshot_retention_days.map(IntervalSpec::days))
    }

    /// Check the policy for completeness and legality.
    ///
    /// Checks run in order and short-circuit on the first failure.
    /// Unit legality is enforced by the [`IntervalUnit`] enum at
    /// deserialization, so no unit check is repeated here. This runs
    /// before any store access.
    ///
    /// [`IntervalUnit`]: crate::interval::IntervalUnit
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster_identifier.is_empty() {
            return Err(ConfigError::MissingClusterIdentifier);
        }
        if self.namespace.is_empty() {
            return Err(ConfigError::MissingNamespace);
        }
        match self.interval() {
            None => return Err(ConfigError::MissingInterval),
            Some(spec) if spec.duration == 0 => return Err(ConfigError::InvalidInterval),
            Some(_) => {}
        }
        if let Some(spec) = self.retention() {
            if spec.duration == 0 {
                return Err(ConfigError::InvalidRetention);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::IntervalUnit;

    #[test]
    fn generalized_event_shape_parses() {
        let policy = SnapshotPolicy::from_json(
            r#"{
                "namespace": "prod",
                "clusterIdentifier": "orders-cluster",
                "snapshotInterval": {"duration": 12, "units": "hours"},
                "snapshotRetention": {"duration": 2, "units": "weeks"}
            }"#,
        )
        .expect("parse");
        assert_eq!(policy.interval(), Some(IntervalSpec::hours(12)));
        assert_eq!(
            policy.retention(),
            Some(IntervalSpec::new(2, IntervalUnit::Weeks))
        );
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn legacy_counts_normalize_to_interval_specs() {
        let policy = SnapshotPolicy::from_json(
            r#"{
                "namespace": "prod",
                "clusterIdentifier": "orders-cluster",
                "snapshotIntervalHours": 24,
                "snapshotRetentionDays": 30
            }"#,
        )
        .expect("parse");
        assert_eq!(policy.interval(), Some(IntervalSpec::hours(24)));
        assert_eq!(policy.retention(), Some(IntervalSpec::days(30)));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn absent_retention_means_retain_forever() {
        let policy = SnapshotPolicy::new("prod", "orders-cluster", IntervalSpec::hours(6));
        assert_eq!(policy.retention(), None);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn missing_cluster_identifier_is_rejected_first() {
        let policy = SnapshotPolicy::from_json(r#"{"namespace": ""}"#).expect("parse");
        assert_eq!(
            policy.validate(),
            Err(ConfigError::MissingClusterIdentifier)
        );
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let policy = SnapshotPolicy::from_json(
            r#"{"namespace": "", "clusterIdentifier": "orders-cluster", "snapshotIntervalHours": 1}"#,
        )
        .expect("parse");
        assert_eq!(policy.validate(), Err(ConfigError::MissingNamespace));
    }

    #[test]
    fn missing_interval_is_rejected() {
        let policy = SnapshotPolicy::from_json(
            r#"{"namespace": "prod", "clusterIdentifier": "orders-cluster"}"#,
        )
        .expect("parse");
        assert_eq!(policy.validate(), Err(ConfigError::MissingInterval));
    }

    #[test]
    fn zero_durations_are_rejected() {
        let policy = SnapshotPolicy::new("prod", "c", IntervalSpec::hours(0));
        assert_eq!(policy.validate(), Err(ConfigError::InvalidInterval));

        let policy =
            SnapshotPolicy::new("prod", "c", IntervalSpec::hours(1)).with_retention(IntervalSpec::days(0));
        assert_eq!(policy.validate(), Err(ConfigError::InvalidRetention));
    }

    #[test]
    fn invalid_unit_is_rejected_at_parse_time() {
        let err = SnapshotPolicy::from_json(
            r#"{
                "namespace": "prod",
                "clusterIdentifier": "orders-cluster",
                "snapshotInterval": {"duration": 3, "units": "fortnights"}
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fortnights"));
    }
}
