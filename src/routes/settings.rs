// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog endpoint settings.

use crate::error::{AppError, Result};
use crate::services::ContentModel;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SettingsResponse {
    /// Endpoint in use
    pub catalog_url: String,
    /// Endpoint from the server configuration
    pub default_catalog_url: String,
    pub custom_catalog_url: Option<String>,
    pub ai_configured: bool,
    pub model: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    /// None or empty restores the configured endpoint
    #[validate(url)]
    pub catalog_url: Option<String>,
}

fn settings_response(state: &AppState) -> SettingsResponse {
    SettingsResponse {
        catalog_url: state.catalog.endpoint(),
        default_catalog_url: state.config.catalog_url.clone(),
        custom_catalog_url: state.session.catalog_endpoint_override(),
        ai_configured: state.generator.model().ensure_configured().is_ok(),
        model: state.config.gemini_model.clone(),
    }
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    Json(settings_response(&state))
}

/// Change the catalog endpoint. A different endpoint invalidates the cache.
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>> {
    payload.catalog_url = payload
        .catalog_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    match payload.catalog_url {
        Some(url) => {
            state.session.set_catalog_endpoint_override(Some(&url))?;
            state.catalog.set_endpoint(url);
        }
        None => {
            state.session.set_catalog_endpoint_override(None)?;
            state.catalog.set_endpoint(state.config.catalog_url.clone());
        }
    }

    Ok(Json(settings_response(&state)))
}
