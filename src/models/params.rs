// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout generation parameters and their option sets.
//!
//! Each option carries the label that goes into the prompt and into saved
//! template metadata. Labels are in the plan locale.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub enum Goal {
    #[default]
    Hypertrophy,
    WeightLoss,
    Strength,
    Endurance,
    Wellness,
}

impl Goal {
    pub const ALL: [Goal; 5] = [
        Goal::Hypertrophy,
        Goal::WeightLoss,
        Goal::Strength,
        Goal::Endurance,
        Goal::Wellness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Goal::Hypertrophy => "Hipertrofia (Ganho de Massa)",
            Goal::WeightLoss => "Emagrecimento (Perda de Peso)",
            Goal::Strength => "Força Pura (Powerlifting)",
            Goal::Endurance => "Resistência Muscular",
            Goal::Wellness => "Saúde e Bem-estar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn label(self) -> &'static str {
        match self {
            Level::Beginner => "Iniciante",
            Level::Intermediate => "Intermediário",
            Level::Advanced => "Avançado",
        }
    }
}

/// Session length in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub enum SessionLength {
    #[serde(rename = "30")]
    Minutes30,
    #[serde(rename = "45")]
    Minutes45,
    #[default]
    #[serde(rename = "60")]
    Minutes60,
    #[serde(rename = "90")]
    Minutes90,
}

impl SessionLength {
    pub const ALL: [SessionLength; 4] = [
        SessionLength::Minutes30,
        SessionLength::Minutes45,
        SessionLength::Minutes60,
        SessionLength::Minutes90,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            SessionLength::Minutes30 => 30,
            SessionLength::Minutes45 => 45,
            SessionLength::Minutes60 => 60,
            SessionLength::Minutes90 => 90,
        }
    }

    pub fn label(self) -> String {
        format!("{} minutos", self.minutes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub enum MuscleFocus {
    #[default]
    FullBody,
    Push,
    Pull,
    Legs,
    ShouldersAbs,
    ChestOnly,
    BackOnly,
    LegsOnly,
    ArmsOnly,
}

impl MuscleFocus {
    pub const ALL: [MuscleFocus; 9] = [
        MuscleFocus::FullBody,
        MuscleFocus::Push,
        MuscleFocus::Pull,
        MuscleFocus::Legs,
        MuscleFocus::ShouldersAbs,
        MuscleFocus::ChestOnly,
        MuscleFocus::BackOnly,
        MuscleFocus::LegsOnly,
        MuscleFocus::ArmsOnly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MuscleFocus::FullBody => "Corpo Todo (Full Body)",
            MuscleFocus::Push => "Peito e Tríceps (Push)",
            MuscleFocus::Pull => "Costas e Bíceps (Pull)",
            MuscleFocus::Legs => "Pernas (Legs)",
            MuscleFocus::ShouldersAbs => "Ombros e Abdômen",
            MuscleFocus::ChestOnly => "Apenas Peito",
            MuscleFocus::BackOnly => "Apenas Costas",
            MuscleFocus::LegsOnly => "Apenas Pernas",
            MuscleFocus::ArmsOnly => "Apenas Braços",
        }
    }
}

/// Everything the user picks before generating a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutParams {
    pub goal: Goal,
    pub level: Level,
    pub duration: SessionLength,
    pub target_muscle: MuscleFocus,
    pub include_cardio: bool,
}
