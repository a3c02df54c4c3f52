// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attach catalog media to generated plans.

use crate::error::AppError;
use crate::models::{Exercise, WorkoutPlan};
use crate::services::catalog::CatalogService;

/// First catalog record matching `exercise`, in catalog order.
///
/// Muscles must be equal ignoring case; names must be equal or one must
/// contain the other, ignoring case.
pub fn find_match<'a>(exercise: &Exercise, catalog: &'a [Exercise]) -> Option<&'a Exercise> {
    let name = exercise.name.to_lowercase();
    let muscle = exercise.muscle.to_lowercase();

    catalog.iter().find(|candidate| {
        let candidate_name = candidate.name.to_lowercase();
        candidate.muscle.to_lowercase() == muscle
            && (candidate_name == name
                || candidate_name.contains(&name)
                || name.contains(&candidate_name))
    })
}

/// Copy media URL and id from the matching catalog record, when it has media.
///
/// Sets, reps, instructions and equipment always stay as generated. Running
/// this twice with the same catalog gives the same plan.
pub fn enrich(mut plan: WorkoutPlan, catalog: &[Exercise]) -> WorkoutPlan {
    for exercise in plan.exercises.iter_mut() {
        let Some(found) = find_match(exercise, catalog) else {
            continue;
        };
        if let Some(media) = found.media() {
            exercise.media_url = Some(media.to_string());
            if !found.id.is_empty() {
                exercise.id = found.id.clone();
            }
        }
    }
    plan
}

/// Best-effort enrichment against the live catalog.
///
/// Returns the plan untouched when the catalog cannot be fetched.
pub async fn enrich_from_catalog(plan: WorkoutPlan, catalog: &CatalogService) -> WorkoutPlan {
    match catalog.try_fetch().await {
        Ok(exercises) => {
            let enriched = enrich(plan, &exercises);
            let with_media = enriched
                .exercises
                .iter()
                .filter(|ex| ex.media().is_some())
                .count();
            tracing::debug!(
                with_media,
                total = enriched.exercises.len(),
                "Plan enriched from catalog"
            );
            enriched
        }
        Err(e) => AppError::Enrichment(e.to_string()).recover(plan, "Skipping plan enrichment"),
    }
}
