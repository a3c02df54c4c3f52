// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::{day_gap_ceil, format_utc_rfc3339, parse_utc_rfc3339};

/// Aggregate workout statistics for one profile.
///
/// Stored at: `ironpulse_<user>_stats`
///
/// `total_workouts` and `total_minutes` never decrease.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStats {
    #[serde(default)]
    pub total_workouts: u32,
    #[serde(default)]
    pub current_streak: u32,
    /// Timestamp of the last finished workout (RFC 3339)
    #[serde(default)]
    pub last_workout_date: Option<String>,
    /// Accumulated training time, fractional minutes
    #[serde(default)]
    pub total_minutes: f64,
}

impl UserStats {
    /// Streak after a workout finished at `now`.
    ///
    /// Gap is measured in whole days rounded up: exactly one day extends the
    /// streak, more than one resets it to 1, zero leaves it unchanged. A
    /// missing or unreadable previous date starts a new streak.
    pub fn next_streak(&self, now: DateTime<Utc>) -> u32 {
        let Some(last) = self.last_workout_date.as_deref().and_then(parse_utc_rfc3339) else {
            return 1;
        };

        match day_gap_ceil(last, now) {
            0 => self.current_streak,
            1 => self.current_streak.saturating_add(1),
            _ => 1,
        }
    }

    /// Stats after a completed workout of `elapsed_seconds` finished at `now`.
    pub fn after_completion(&self, elapsed_seconds: u64, now: DateTime<Utc>) -> Self {
        Self {
            total_workouts: self.total_workouts.saturating_add(1),
            current_streak: self.next_streak(now),
            last_workout_date: Some(format_utc_rfc3339(now)),
            total_minutes: self.total_minutes + elapsed_seconds as f64 / 60.0,
        }
    }
}
