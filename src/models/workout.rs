// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved templates, workout history and the per-user data bundle.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Exercise, UserStats};

/// A plan snapshot saved by the user for later reuse.
///
/// Stored (as a list, most recent first) at: `ironpulse_<user>_saved_workouts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SavedWorkout {
    pub id: String,
    pub name: String,
    pub exercises: Vec<Exercise>,
    /// When the template was saved (RFC 3339)
    pub created_at: String,
    pub target_muscle: String,
    pub goal: String,
}

/// Metadata attached to a plan when it is saved as a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    pub target_muscle: String,
    pub goal: String,
}

/// One finished workout.
///
/// Stored (append-only) at: `ironpulse_<user>_history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryEntry {
    /// Completion time (RFC 3339)
    pub date: String,
    #[serde(alias = "duration")]
    pub duration_seconds: u64,
}

/// Everything persisted for one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserData {
    pub stats: UserStats,
    pub history: Vec<HistoryEntry>,
    pub saved_workouts: Vec<SavedWorkout>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_reads_legacy_duration_field() {
        let entries: Vec<HistoryEntry> =
            serde_json::from_str(r#"[{"date":"2026-01-05T10:00:00.000Z","duration":2700}]"#)
                .unwrap();
        assert_eq!(entries[0].duration_seconds, 2700);

        let out = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(out["durationSeconds"], 2700);
    }
}
