// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Active-profile middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie carrying the selected profile name.
pub const PROFILE_COOKIE: &str = "ironpulse_profile";

/// Header alternative to the cookie, for non-browser clients.
pub const PROFILE_HEADER: &str = "x-profile";

/// Profile the request acts for.
#[derive(Debug, Clone)]
pub struct ActiveProfile {
    pub name: String,
}

/// Longest accepted profile name, in characters.
pub const MAX_PROFILE_NAME: usize = 64;

/// Resolve the profile: cookie, then header, then the stored pointer.
///
/// Only registered names within `MAX_PROFILE_NAME` count; anything else
/// falls through to the next source.
pub fn resolve_profile(state: &AppState, jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    let users = state.session.list_users();
    let known = |name: &str| {
        let name = name.trim();
        (name.chars().count() <= MAX_PROFILE_NAME && users.iter().any(|u| u == name))
            .then(|| name.to_string())
    };

    jar.get(PROFILE_COOKIE)
        .and_then(|c| known(c.value()))
        .or_else(|| {
            headers
                .get(PROFILE_HEADER)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| known(h))
        })
        .or_else(|| state.session.current_user().and_then(|n| known(&n)))
}

/// Middleware that requires an active profile.
pub async fn require_profile(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let name = resolve_profile(&state, &jar, request.headers()).ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(ActiveProfile { name });
    Ok(next.run(request).await)
}
