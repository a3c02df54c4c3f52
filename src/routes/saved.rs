// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved workout templates (require an active profile).

use crate::error::{AppError, Result};
use crate::middleware::ActiveProfile;
use crate::models::{SavedWorkout, TemplateMeta, WorkoutPlan};
use crate::services::RuntimeSnapshot;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/saved", get(list_saved))
        .route("/api/saved/{id}/load", post(load_saved))
        .route("/api/saved/{id}", delete(delete_saved))
}

/// Saved templates, most recent first.
async fn list_saved(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
) -> Json<Vec<SavedWorkout>> {
    Json(state.session.load_user_data(&profile.name).saved_workouts)
}

/// Load a template into the runtime as a fresh plan.
async fn load_saved(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
    Path(id): Path<String>,
) -> Result<Json<RuntimeSnapshot>> {
    let saved = state.session.saved_workout(&profile.name, &id)?;
    let meta = TemplateMeta {
        target_muscle: saved.target_muscle,
        goal: saved.goal,
    };
    let plan = WorkoutPlan {
        name: saved.name,
        exercises: saved.exercises,
    };

    let runtime = state.runtime_for(&profile.name);
    let mut runtime = runtime.lock().await;
    runtime.load_plan(plan, meta)?;
    Ok(Json(runtime.snapshot()))
}

async fn delete_saved(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.session.delete_workout_template(&profile.name, &id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Saved workout {}", id)))
    }
}
