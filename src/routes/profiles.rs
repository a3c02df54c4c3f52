// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile registry and selection.

use crate::error::{AppError, Result};
use crate::middleware::profile::{resolve_profile, PROFILE_COOKIE};
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profiles", get(list_profiles).post(select_profile))
        .route("/api/profiles/logout", post(logout))
}

/// Known profiles and the one this request resolves to.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfilesResponse {
    pub users: Vec<String>,
    pub current: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SelectProfileRequest {
    /// Same bound as `MAX_PROFILE_NAME`
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

async fn list_profiles(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Json<ProfilesResponse> {
    Json(ProfilesResponse {
        users: state.session.list_users(),
        current: resolve_profile(&state, &jar, &headers),
    })
}

/// Register the profile if new and make it the current one.
async fn select_profile(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SelectProfileRequest>,
) -> Result<(CookieJar, Json<ProfilesResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let name = state.session.register_user(&payload.name)?;
    state.session.set_current_user(&name)?;
    tracing::info!(user = %name, "Profile selected");

    let cookie = Cookie::build((PROFILE_COOKIE, name.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure_cookies(&state))
        .build();

    Ok((
        jar.add(cookie),
        Json(ProfilesResponse {
            users: state.session.list_users(),
            current: Some(name),
        }),
    ))
}

/// Forget the current profile and drop its workout runtime.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(StatusCode, CookieJar)> {
    if let Some(name) = resolve_profile(&state, &jar, &headers) {
        state.drop_runtime(&name);
        tracing::info!(user = %name, "Profile logged out");
    }
    state.session.clear_current_user()?;

    let removal = Cookie::build(PROFILE_COOKIE)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure_cookies(&state));

    Ok((StatusCode::NO_CONTENT, jar.remove(removal)))
}

fn secure_cookies(state: &AppState) -> bool {
    state.config.frontend_url.starts_with("https://")
}
