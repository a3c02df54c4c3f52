// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog search and the option sets for plan generation.

use crate::models::{Exercise, Goal, Level, MuscleFocus, SessionLength};
use crate::services::CatalogQuery;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/catalog/search", get(search_catalog))
        .route("/api/options", get(get_options))
}

/// Search the catalog. Never fails: an unreachable catalog serves the
/// built-in list.
async fn search_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<Exercise>> {
    Json(state.catalog.search(&query).await)
}

/// One selectable value and its display label.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OptionsResponse {
    pub goals: Vec<OptionItem>,
    pub levels: Vec<OptionItem>,
    pub durations: Vec<OptionItem>,
    pub target_muscles: Vec<OptionItem>,
}

/// Wire name of a unit enum variant.
fn wire_value<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

fn items<T: Serialize + Copy>(all: &[T], label: impl Fn(T) -> String) -> Vec<OptionItem> {
    all.iter()
        .map(|&v| OptionItem {
            value: wire_value(&v),
            label: label(v),
        })
        .collect()
}

async fn get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        goals: items(&Goal::ALL, |g| g.label().to_string()),
        levels: items(&Level::ALL, |l| l.label().to_string()),
        durations: items(&SessionLength::ALL, SessionLength::label),
        target_muscles: items(&MuscleFocus::ALL, |m| m.label().to_string()),
    })
}
