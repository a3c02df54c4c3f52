// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use ironpulse::config::Config;
use ironpulse::db::LocalStore;
use ironpulse::routes::create_router;
use ironpulse::AppState;
use serde_json::Value;
use std::sync::Arc;

/// Create a test app with an in-memory store and unreachable upstreams.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, LocalStore::in_memory()));
    (create_router(state.clone()), state)
}

/// Test app with `profiles` already registered.
#[allow(dead_code)]
pub fn create_test_app_with_profiles(
    config: Config,
    profiles: &[&str],
) -> (axum::Router, Arc<AppState>) {
    let (app, state) = create_test_app_with_config(config);
    for name in profiles {
        state.session.register_user(name).unwrap();
    }
    (app, state)
}

/// Build a request acting as `profile` via the profile header.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, profile: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(profile) = profile {
        builder = builder.header("X-Profile", profile);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve `router` on an ephemeral local port, returning its base URL.
#[allow(dead_code)]
pub async fn spawn_upstream(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
