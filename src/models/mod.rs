// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod exercise;
pub mod params;
pub mod stats;
pub mod workout;

pub use exercise::{Exercise, WorkoutPlan};
pub use params::{Goal, Level, MuscleFocus, SessionLength, WorkoutParams};
pub use stats::UserStats;
pub use workout::{HistoryEntry, SavedWorkout, TemplateMeta, UserData};
