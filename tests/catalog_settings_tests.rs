// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog search, caching and endpoint settings.

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

mod common;
use common::{body_json, request};

/// Catalog stand-in serving two paths, counting every fetch.
async fn spawn_counting_catalog() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let first = hits.clone();
    let second = hits.clone();

    let router = Router::new()
        .route(
            "/a.json",
            get(move || {
                first.fetch_add(1, Ordering::SeqCst);
                async {
                    Json(json!([
                        { "id": 1, "name": "Remada Curvada", "muscle": "Costas" },
                        { "id": 2, "name": "Puxada Alta", "muscle": "Costas" },
                        { "id": 3, "name": "Agachamento Sumô", "muscle": "Pernas" }
                    ]))
                }
            }),
        )
        .route(
            "/b.json",
            get(move || {
                second.fetch_add(1, Ordering::SeqCst);
                async { Json(json!({ "data": [{ "id": 9, "nome": "Flexão", "grupo_muscular": "Peito" }] })) }
            }),
        );

    (common::spawn_upstream(router).await, hits)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request("GET", uri, None, None)).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn put_settings(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request("PUT", "/api/settings", None, Some(body)))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_unreachable_catalog_serves_builtin_list() {
    let (app, state) = common::create_test_app();

    let (status, all) = get_json(&app, "/api/catalog/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 10);
    // The built-in list is never cached
    assert!(state.catalog.cache().is_empty());

    let (_, legs) = get_json(&app, "/api/catalog/search?muscle=legs").await;
    let names: Vec<&str> = legs
        .as_array()
        .unwrap()
        .iter()
        .map(|ex| ex["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Agachamento Livre", "Leg Press 45"]);
}

#[tokio::test]
async fn test_search_filters_and_caches() {
    let (base, hits) = spawn_counting_catalog().await;
    let (app, _) = common::create_test_app();

    let (status, _) = put_settings(&app, json!({ "catalogUrl": format!("{}/a.json", base) })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, back) = get_json(&app, "/api/catalog/search?muscle=back").await;
    assert_eq!(back.as_array().unwrap().len(), 2);

    let (_, by_name) = get_json(&app, "/api/catalog/search?muscle=Costas&name=remada").await;
    assert_eq!(by_name.as_array().unwrap().len(), 1);
    assert_eq!(by_name[0]["id"], "1");

    let (_, empty) = get_json(&app, "/api/catalog/search?muscle=&name=").await;
    assert_eq!(empty.as_array().unwrap().len(), 3);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_endpoint_change_invalidates_cache() {
    let (base, hits) = spawn_counting_catalog().await;
    let (app, state) = common::create_test_app();

    put_settings(&app, json!({ "catalogUrl": format!("{}/a.json", base) })).await;
    get_json(&app, "/api/catalog/search").await;
    assert!(!state.catalog.cache().is_empty());

    // Same URL again keeps the cache
    put_settings(&app, json!({ "catalogUrl": format!("{}/a.json", base) })).await;
    assert!(!state.catalog.cache().is_empty());

    let (status, settings) =
        put_settings(&app, json!({ "catalogUrl": format!("{}/b.json", base) })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["customCatalogUrl"], format!("{}/b.json", base));
    assert!(state.catalog.cache().is_empty());

    let (_, results) = get_json(&app, "/api/catalog/search").await;
    assert_eq!(results[0]["name"], "Flexão");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_settings_reject_invalid_url_and_reset() {
    let (app, state) = common::create_test_app();

    let (status, _) = put_settings(&app, json!({ "catalogUrl": "not a url" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(state.session.catalog_endpoint_override().is_none());

    put_settings(&app, json!({ "catalogUrl": "https://catalog.example/db.json" })).await;
    assert_eq!(
        state.session.catalog_endpoint_override().as_deref(),
        Some("https://catalog.example/db.json")
    );

    let (status, settings) = put_settings(&app, json!({ "catalogUrl": "" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(settings["customCatalogUrl"].is_null());
    assert_eq!(settings["catalogUrl"], settings["defaultCatalogUrl"]);
    assert_eq!(settings["aiConfigured"], false);
}

#[tokio::test]
async fn test_options_list_every_choice() {
    let (app, _) = common::create_test_app();

    let (status, options) = get_json(&app, "/api/options").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(options["goals"].as_array().unwrap().len(), 5);
    assert_eq!(options["levels"].as_array().unwrap().len(), 3);
    assert_eq!(options["durations"][1]["value"], "45");
    assert_eq!(options["durations"][1]["label"], "45 minutos");
    assert_eq!(options["targetMuscles"].as_array().unwrap().len(), 9);
}
