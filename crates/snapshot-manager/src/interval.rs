/*
 * SPDX-FileCopyrightText: 2025 Snapshot Manager Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Interval specifications and time window resolution

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Supported units for interval and retention specifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

/// A duration expressed as a count of a fixed unit.
///
/// This is the normalized form of both the generalized
/// `{duration, units}` configuration shape and the legacy hour/day
/// count fields; by the time a spec reaches this module the legacy
/// forms have already been rewritten by the config layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSpec {
    pub duration: u32,
    pub units: IntervalUnit,
}

impl IntervalSpec {
    pub fn new(duration: u32, units: IntervalUnit) -> Self {
        Self { duration, units }
    }

    pub fn hours(duration: u32) -> Self {
        Self::new(duration, IntervalUnit::Hours)
    }

    pub fn days(duration: u32) -> Self {
        Self::new(duration, IntervalUnit::Days)
    }

    /// Convert to an absolute duration. Weeks are 7 fixed days; no
    /// calendar-aware month arithmetic exists at this layer.
    pub fn to_duration(self) -> Duration {
        let n = i64::from(self.duration);
        match self.units {
            IntervalUnit::Minutes => Duration::minutes(n),
            IntervalUnit::Hours => Duration::hours(n),
            IntervalUnit::Days => Duration::days(n),
            IntervalUnit::Weeks => Duration::weeks(n),
        }
    }
}

/// Open-ended time window passed to snapshot discovery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Window covering everything since `now - spec`: used for the
    /// interval check ("is there a recent manual snapshot?").
    pub fn since(spec: IntervalSpec, now: DateTime<Utc>) -> Self {
        Self {
            start: Some(now - spec.to_duration()),
            end: None,
        }
    }

    /// Window covering everything before `now - spec`: used for the
    /// retention check ("which manual snapshots have aged out?").
    pub fn before(spec: IntervalSpec, now: DateTime<Utc>) -> Self {
        Self {
            start: None,
            end: Some(now - spec.to_duration()),
        }
    }

    /// Whether a timestamp falls within the window (bounds inclusive)
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}
