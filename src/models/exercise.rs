// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise and workout plan models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single exercise, either from the catalog or produced by the AI model.
///
/// `name` + `muscle` is the identity used to match across sources; `id` is
/// opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub muscle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    /// Image or animation URL (older records call it `gifUrl`)
    #[serde(default, alias = "gifUrl", skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl Exercise {
    /// Media URL if present and non-empty.
    pub fn media(&self) -> Option<&str> {
        self.media_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// A named, ordered list of exercises from one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutPlan {
    pub name: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutPlan {
    /// Position of the first exercise with exactly this name.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.exercises.iter().position(|ex| ex.name == name)
    }
}
