// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile selection, cookie handling and CORS tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use ironpulse::config::Config;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, request};

fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .find(|value| value.starts_with("ironpulse_profile="))
        .unwrap_or_else(|| panic!("missing ironpulse_profile cookie"))
}

#[tokio::test]
async fn test_protected_routes_require_profile() {
    let (app, _) = common::create_test_app();

    for (method, uri) in [
        ("GET", "/api/me"),
        ("GET", "/api/workout"),
        ("POST", "/api/workout/start"),
        ("GET", "/api/saved"),
    ] {
        let response = app
            .clone()
            .oneshot(request(method, uri, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_profile_header_selects_profile() {
    let (app, _) = common::create_test_app_with_profiles(Config::default(), &["Ana"]);

    let response = app
        .oneshot(request("GET", "/api/me", Some("Ana"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Ana");
    assert_eq!(body["stats"]["totalWorkouts"], 0);
    assert_eq!(body["history"], json!([]));
    assert_eq!(body["savedWorkouts"], json!([]));
}

#[tokio::test]
async fn test_cookie_wins_over_header() {
    let (app, _) = common::create_test_app_with_profiles(Config::default(), &["Ana", "Bruno"]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(header::COOKIE, "ironpulse_profile=Bruno")
                .header("X-Profile", "Ana")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(body_json(response).await["name"], "Bruno");
}

#[tokio::test]
async fn test_unregistered_profile_is_rejected() {
    let (app, state) = common::create_test_app();
    let long_name = "x".repeat(500);

    for name in ["Ana", long_name.as_str()] {
        let response = app
            .clone()
            .oneshot(request("GET", "/api/me", Some(name), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    assert!(state.session.list_users().is_empty());
}

#[tokio::test]
async fn test_unknown_cookie_falls_through_to_header() {
    let (app, _) = common::create_test_app_with_profiles(Config::default(), &["Ana"]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(header::COOKIE, "ironpulse_profile=Ghost")
                .header("X-Profile", "Ana")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Ana");
}

#[tokio::test]
async fn test_select_profile_registers_and_sets_cookie() {
    let (app, state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/profiles",
            None,
            Some(json!({ "name": "  Ana  " })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("ironpulse_profile=Ana"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"));

    let body = body_json(response).await;
    assert_eq!(body["users"], json!(["Ana"]));
    assert_eq!(body["current"], "Ana");

    // Registering again does not duplicate
    app.clone()
        .oneshot(request("POST", "/api/profiles", None, Some(json!({ "name": "Ana" }))))
        .await
        .unwrap();
    assert_eq!(state.session.list_users(), vec!["Ana".to_string()]);

    // Without cookie or header the stored pointer is used
    let response = app
        .oneshot(request("GET", "/api/me", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Ana");
}

#[tokio::test]
async fn test_select_profile_rejects_blank_name() {
    let (app, state) = common::create_test_app();

    for name in ["", "   "] {
        let response = app
            .clone()
            .oneshot(request("POST", "/api/profiles", None, Some(json!({ "name": name }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert!(state.session.list_users().is_empty());
}

#[tokio::test]
async fn test_logout_clears_pointer_and_cookie() {
    let (app, state) = common::create_test_app();
    state.session.register_user("Ana").unwrap();
    state.session.set_current_user("Ana").unwrap();
    let _ = state.runtime_for("Ana");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/profiles/logout")
                .header(header::COOKIE, "ironpulse_profile=Ana")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = set_cookie(&response);
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));

    assert!(state.session.current_user().is_none());
    assert!(!state.runtimes.contains_key("Ana"));
    // The profile itself stays registered
    assert_eq!(state.session.list_users(), vec!["Ana".to_string()]);

    let response = app
        .oneshot(request("GET", "/api/me", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_secure_cookie_for_https_frontend() {
    let (app, _) = common::create_test_app_with_config(Config {
        frontend_url: "https://ironpulse.example".to_string(),
        ..Config::default()
    });

    let response = app
        .oneshot(request("POST", "/api/profiles", None, Some(json!({ "name": "Ana" }))))
        .await
        .unwrap();

    assert!(set_cookie(&response).contains("Secure"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/workout")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_routes_need_no_profile() {
    let (app, _) = common::create_test_app();

    for uri in ["/health", "/api/profiles", "/api/options", "/api/settings"] {
        let response = app
            .clone()
            .oneshot(request("GET", uri, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
    }
}
