// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan generation and the running workout (require an active profile).

use crate::error::{AppError, Result};
use crate::middleware::ActiveProfile;
use crate::models::{Exercise, SavedWorkout, TemplateMeta, UserData, UserStats, WorkoutParams};
use crate::services::{enrich_from_catalog, RuntimeSnapshot, RuntimeState};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Workout routes. The profile middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/workout", get(get_workout))
        .route("/api/workout/generate", post(generate_workout))
        .route("/api/workout/start", post(start_workout))
        .route("/api/workout/finish", post(finish_workout))
        .route("/api/workout/discard", post(discard_workout))
        .route("/api/workout/save", post(save_workout))
        .route("/api/workout/complete", post(toggle_complete))
        .route("/api/workout/swap", post(swap_exercise))
        .route("/api/workout/alternatives", get(get_alternatives))
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub name: String,
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(flatten))]
    pub data: UserData,
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
) -> Json<MeResponse> {
    let data = state.session.load_user_data(&profile.name);
    Json(MeResponse {
        name: profile.name,
        data,
    })
}

// ─── Plan ────────────────────────────────────────────────────

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
) -> Json<RuntimeSnapshot> {
    let runtime = state.runtime_for(&profile.name);
    let snapshot = runtime.lock().await.snapshot();
    Json(snapshot)
}

/// Generate a plan, enrich it from the catalog and load it for review.
async fn generate_workout(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
    Json(params): Json<WorkoutParams>,
) -> Result<Json<RuntimeSnapshot>> {
    let runtime = state.runtime_for(&profile.name);

    // Fail before the model call rather than after it.
    if runtime.lock().await.state() == RuntimeState::Active {
        return Err(AppError::InvalidState(
            "Finish or discard the running workout first".to_string(),
        ));
    }

    tracing::info!(user = %profile.name, ?params, "Generating workout plan");
    let plan = state.generator.generate(&params).await?;
    let plan = enrich_from_catalog(plan, &state.catalog).await;

    let meta = TemplateMeta {
        target_muscle: params.target_muscle.label().to_string(),
        goal: params.goal.label().to_string(),
    };

    let mut runtime = runtime.lock().await;
    runtime.load_plan(plan, meta)?;
    Ok(Json(runtime.snapshot()))
}

// ─── Session ─────────────────────────────────────────────────

async fn start_workout(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
) -> Result<Json<RuntimeSnapshot>> {
    let runtime = state.runtime_for(&profile.name);
    let mut runtime = runtime.lock().await;
    runtime.start()?;
    Ok(Json(runtime.snapshot()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FinishResponse {
    pub stats: UserStats,
}

async fn finish_workout(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
) -> Result<Json<FinishResponse>> {
    let runtime = state.runtime_for(&profile.name);
    let stats = runtime
        .lock()
        .await
        .finish(&state.session, &profile.name)?;
    Ok(Json(FinishResponse { stats }))
}

async fn discard_workout(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
) -> Json<RuntimeSnapshot> {
    let runtime = state.runtime_for(&profile.name);
    let mut runtime = runtime.lock().await;
    runtime.discard();
    Json(runtime.snapshot())
}

async fn save_workout(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
) -> Result<Json<SavedWorkout>> {
    let runtime = state.runtime_for(&profile.name);
    let saved = runtime
        .lock()
        .await
        .save_template(&state.session, &profile.name)?;
    Ok(Json(saved))
}

// ─── Exercises ───────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteRequest {
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompleteResponse {
    pub name: String,
    pub completed: bool,
}

async fn toggle_complete(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
    Json(payload): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let runtime = state.runtime_for(&profile.name);
    let completed = runtime.lock().await.toggle_complete(&payload.name)?;
    Ok(Json(CompleteResponse {
        name: payload.name,
        completed,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SwapRequest {
    /// Name of the exercise being replaced
    #[validate(length(min = 1))]
    pub exercise: String,
    pub replacement: Exercise,
}

async fn swap_exercise(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
    Json(payload): Json<SwapRequest>,
) -> Result<Json<RuntimeSnapshot>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let runtime = state.runtime_for(&profile.name);
    let mut runtime = runtime.lock().await;
    runtime.swap(&payload.exercise, payload.replacement)?;
    Ok(Json(runtime.snapshot()))
}

#[derive(Debug, Deserialize)]
struct AlternativesQuery {
    exercise: String,
    /// Optional name filter
    name: Option<String>,
}

/// Catalog exercises for the same muscle group as a planned exercise.
async fn get_alternatives(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<ActiveProfile>,
    Query(query): Query<AlternativesQuery>,
) -> Result<Json<Vec<Exercise>>> {
    let exercise = {
        let runtime = state.runtime_for(&profile.name);
        let runtime = runtime.lock().await;
        let plan = runtime
            .plan()
            .ok_or_else(|| AppError::InvalidState("No workout plan loaded".to_string()))?;
        let found = plan
            .exercises
            .iter()
            .find(|ex| ex.name == query.exercise)
            .cloned();
        found.ok_or_else(|| {
            AppError::NotFound(format!("Exercise '{}' not in plan", query.exercise))
        })?
    };

    let name = query.name.filter(|n| !n.trim().is_empty());
    Ok(Json(state.catalog.alternatives(&exercise, name).await))
}
