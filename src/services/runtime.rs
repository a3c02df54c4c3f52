// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-profile workout session: plan, completion marks and the running clock.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::{Exercise, SavedWorkout, TemplateMeta, UserStats, WorkoutPlan};
use crate::services::session::SessionStore;
use crate::time_utils::format_utc_rfc3339;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Lifecycle of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RuntimeState {
    #[default]
    Idle,
    Planned,
    Active,
}

/// Background task refreshing the elapsed-seconds counter once a second.
///
/// Dropping the guard aborts the task.
struct Ticker {
    handle: JoinHandle<()>,
    elapsed: Arc<AtomicU64>,
    started: Instant,
}

impl Ticker {
    fn spawn(started: Instant) -> Self {
        let elapsed = Arc::new(AtomicU64::new(0));
        let counter = elapsed.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;
                counter.store(started.elapsed().as_secs(), Ordering::Relaxed);
            }
        });

        Self {
            handle,
            elapsed,
            started,
        }
    }

    /// Last value published by the tick.
    fn ticked_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    /// Exact elapsed time from the start instant.
    fn elapsed_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serializable view of a runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RuntimeSnapshot {
    pub state: RuntimeState,
    pub plan: Option<WorkoutPlan>,
    pub target_muscle: Option<String>,
    pub goal: Option<String>,
    pub completed: Vec<String>,
    pub elapsed_seconds: u64,
    pub started_at: Option<String>,
}

/// One profile's workout session.
#[derive(Default)]
pub struct WorkoutRuntime {
    state: RuntimeState,
    plan: Option<WorkoutPlan>,
    meta: TemplateMeta,
    completed: BTreeSet<String>,
    started_at: Option<DateTime<Utc>>,
    ticker: Option<Ticker>,
}

impl WorkoutRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    pub fn plan(&self) -> Option<&WorkoutPlan> {
        self.plan.as_ref()
    }

    fn loaded_plan(&self) -> Result<&WorkoutPlan, AppError> {
        self.plan
            .as_ref()
            .ok_or_else(|| AppError::InvalidState("No workout plan loaded".to_string()))
    }

    /// Load a plan for review. Not allowed while a workout is running.
    pub fn load_plan(&mut self, plan: WorkoutPlan, meta: TemplateMeta) -> Result<(), AppError> {
        if self.state == RuntimeState::Active {
            return Err(AppError::InvalidState(
                "Finish or discard the running workout first".to_string(),
            ));
        }

        tracing::debug!(plan = %plan.name, exercises = plan.exercises.len(), "Plan loaded");
        self.plan = Some(plan);
        self.meta = meta;
        self.completed.clear();
        self.state = RuntimeState::Planned;
        Ok(())
    }

    /// Start the clock on the loaded plan.
    pub fn start(&mut self) -> Result<(), AppError> {
        match self.state {
            RuntimeState::Planned => {}
            RuntimeState::Idle => {
                return Err(AppError::InvalidState("No workout plan loaded".to_string()))
            }
            RuntimeState::Active => {
                return Err(AppError::InvalidState("Workout already started".to_string()))
            }
        }

        self.started_at = Some(Utc::now());
        self.ticker = Some(Ticker::spawn(Instant::now()));
        self.state = RuntimeState::Active;
        tracing::info!("Workout started");
        Ok(())
    }

    /// Flip the completion mark of an exercise. Returns the new mark.
    pub fn toggle_complete(&mut self, name: &str) -> Result<bool, AppError> {
        let plan = self.loaded_plan()?;
        if plan.position_of(name).is_none() {
            return Err(AppError::NotFound(format!("Exercise '{}' not in plan", name)));
        }

        if self.completed.remove(name) {
            Ok(false)
        } else {
            self.completed.insert(name.to_string());
            Ok(true)
        }
    }

    /// Replace the first exercise called `name`, keeping its position,
    /// sets and reps. Not allowed while the workout is running.
    pub fn swap(&mut self, name: &str, replacement: Exercise) -> Result<Exercise, AppError> {
        if self.state == RuntimeState::Active {
            return Err(AppError::InvalidState(
                "Exercises cannot be swapped during a workout".to_string(),
            ));
        }

        let plan = self
            .plan
            .as_mut()
            .ok_or_else(|| AppError::InvalidState("No workout plan loaded".to_string()))?;
        let position = plan
            .position_of(name)
            .ok_or_else(|| AppError::NotFound(format!("Exercise '{}' not in plan", name)))?;

        let current = &plan.exercises[position];
        let swapped = Exercise {
            sets: current.sets,
            reps: current.reps.clone(),
            ..replacement
        };
        plan.exercises[position] = swapped.clone();
        self.completed.remove(name);

        tracing::debug!(from = name, to = %swapped.name, position, "Exercise swapped");
        Ok(swapped)
    }

    /// Record the running workout and return to Idle.
    ///
    /// If recording fails the workout keeps running.
    pub fn finish(&mut self, session: &SessionStore, user: &str) -> Result<UserStats, AppError> {
        let elapsed = match (&self.state, &self.ticker) {
            (RuntimeState::Active, Some(ticker)) => ticker.elapsed_seconds(),
            _ => {
                return Err(AppError::InvalidState(
                    "No workout is running".to_string(),
                ))
            }
        };

        let stats = session.record_completion(user, elapsed)?;
        self.reset();
        Ok(stats)
    }

    /// Abandon the plan without recording anything.
    pub fn discard(&mut self) {
        if self.state != RuntimeState::Idle {
            tracing::info!(state = ?self.state, "Workout discarded");
        }
        self.reset();
    }

    /// Save the loaded plan as a template.
    pub fn save_template(
        &self,
        session: &SessionStore,
        user: &str,
    ) -> Result<SavedWorkout, AppError> {
        let plan = self.loaded_plan()?;
        session.save_workout_template(user, plan, &self.meta)
    }

    pub fn snapshot(&self) -> RuntimeSnapshot {
        let has_plan = self.plan.is_some();
        RuntimeSnapshot {
            state: self.state,
            plan: self.plan.clone(),
            target_muscle: has_plan.then(|| self.meta.target_muscle.clone()),
            goal: has_plan.then(|| self.meta.goal.clone()),
            completed: self.completed.iter().cloned().collect(),
            elapsed_seconds: self.ticker.as_ref().map_or(0, Ticker::ticked_seconds),
            started_at: self.started_at.map(format_utc_rfc3339),
        }
    }

    fn reset(&mut self) {
        self.ticker = None;
        self.started_at = None;
        self.plan = None;
        self.meta = TemplateMeta::default();
        self.completed.clear();
        self.state = RuntimeState::Idle;
    }
}
