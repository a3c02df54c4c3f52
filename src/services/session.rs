// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profiles, statistics, history and saved templates.

use chrono::{DateTime, Utc};

use crate::db::{keys, LocalStore};
use crate::error::AppError;
use crate::models::{
    HistoryEntry, SavedWorkout, TemplateMeta, UserData, UserStats, WorkoutPlan,
};
use crate::time_utils::format_utc_rfc3339;

/// Per-user persistence on top of the local key-value store.
///
/// Every per-user key carries the `ironpulse_<user>_` prefix, so one profile
/// never sees another's data.
#[derive(Clone)]
pub struct SessionStore {
    store: LocalStore,
}

impl SessionStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Load stats, history and saved templates. Missing or corrupt records
    /// come back as their defaults.
    pub fn load_user_data(&self, user: &str) -> UserData {
        UserData {
            stats: self.store.get_json(&keys::stats(user)).unwrap_or_default(),
            history: self.store.get_json(&keys::history(user)).unwrap_or_default(),
            saved_workouts: self
                .store
                .get_json(&keys::saved_workouts(user))
                .unwrap_or_default(),
        }
    }

    fn saved_workouts(&self, user: &str) -> Vec<SavedWorkout> {
        self.store
            .get_json(&keys::saved_workouts(user))
            .unwrap_or_default()
    }

    /// Save a plan as a template at the front of the user's list.
    pub fn save_workout_template(
        &self,
        user: &str,
        plan: &WorkoutPlan,
        meta: &TemplateMeta,
    ) -> Result<SavedWorkout, AppError> {
        let template = SavedWorkout {
            id: uuid::Uuid::new_v4().to_string(),
            name: plan.name.clone(),
            exercises: plan.exercises.clone(),
            created_at: format_utc_rfc3339(Utc::now()),
            target_muscle: meta.target_muscle.clone(),
            goal: meta.goal.clone(),
        };

        let mut saved = self.saved_workouts(user);
        saved.insert(0, template.clone());
        self.store.set_json(&keys::saved_workouts(user), &saved)?;

        tracing::info!(user, template_id = %template.id, "Saved workout template");
        Ok(template)
    }

    /// Fetch one saved template.
    pub fn saved_workout(&self, user: &str, id: &str) -> Result<SavedWorkout, AppError> {
        self.saved_workouts(user)
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Saved workout {}", id)))
    }

    /// Remove a template by id. Returns false (and writes nothing) if absent.
    pub fn delete_workout_template(&self, user: &str, id: &str) -> Result<bool, AppError> {
        let mut saved = self.saved_workouts(user);
        let before = saved.len();
        saved.retain(|w| w.id != id);

        if saved.len() == before {
            return Ok(false);
        }

        self.store.set_json(&keys::saved_workouts(user), &saved)?;
        tracing::info!(user, template_id = id, "Deleted workout template");
        Ok(true)
    }

    /// Record a finished workout of `elapsed_seconds`.
    pub fn record_completion(
        &self,
        user: &str,
        elapsed_seconds: u64,
    ) -> Result<UserStats, AppError> {
        self.record_completion_at(user, elapsed_seconds, Utc::now())
    }

    /// Record a finished workout as of `now`.
    ///
    /// Stats and history are written together: on error neither changes.
    pub fn record_completion_at(
        &self,
        user: &str,
        elapsed_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<UserStats, AppError> {
        let data = self.load_user_data(user);
        let stats = data.stats.after_completion(elapsed_seconds, now);

        let mut history = data.history;
        history.push(HistoryEntry {
            date: format_utc_rfc3339(now),
            duration_seconds: elapsed_seconds,
        });

        self.store.set_many(vec![
            (keys::stats(user), LocalStore::encode(&stats)?),
            (keys::history(user), LocalStore::encode(&history)?),
        ])?;

        tracing::info!(
            user,
            elapsed_seconds,
            streak = stats.current_streak,
            total_workouts = stats.total_workouts,
            "Recorded workout completion"
        );
        Ok(stats)
    }

    /// Known profile names, in registration order.
    pub fn list_users(&self) -> Vec<String> {
        self.store.get_json(keys::USERS).unwrap_or_default()
    }

    /// Register a profile name (trimmed). Registering an existing name is a
    /// no-op. Returns the stored name.
    pub fn register_user(&self, name: &str) -> Result<String, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Profile name is empty".to_string()));
        }

        let mut users = self.list_users();
        if !users.iter().any(|u| u == name) {
            users.push(name.to_string());
            self.store.set_json(keys::USERS, &users)?;
            tracing::info!(user = name, "Registered profile");
        }
        Ok(name.to_string())
    }

    /// The persisted current-profile pointer.
    pub fn current_user(&self) -> Option<String> {
        self.store
            .get_json::<String>(keys::CURRENT_USER)
            .filter(|name| !name.trim().is_empty())
    }

    pub fn set_current_user(&self, name: &str) -> Result<(), AppError> {
        self.store.set_json(keys::CURRENT_USER, &name)
    }

    pub fn clear_current_user(&self) -> Result<(), AppError> {
        self.store.remove(keys::CURRENT_USER)
    }

    /// Catalog endpoint chosen in settings, if any.
    pub fn catalog_endpoint_override(&self) -> Option<String> {
        self.store
            .get_json::<String>(keys::CATALOG_URL_OVERRIDE)
            .filter(|url| !url.trim().is_empty())
    }

    /// Set or (with `None`) clear the catalog endpoint override.
    pub fn set_catalog_endpoint_override(&self, url: Option<&str>) -> Result<(), AppError> {
        match url {
            Some(url) => self.store.set_json(keys::CATALOG_URL_OVERRIDE, &url),
            None => self.store.remove(keys::CATALOG_URL_OVERRIDE),
        }
    }
}
