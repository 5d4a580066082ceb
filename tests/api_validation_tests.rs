// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Input validation across every endpoint.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

const BAD_TOKENS: [&str; 4] = ["short", "tok%20with%20space", "tok'%20OR%201=1", ""];

#[tokio::test]
async fn test_bad_token_rejected_by_query_endpoints() {
    for path in [
        "/api/getAvailableApps",
        "/api/getAvailableGames",
        "/api/getUserApps",
    ] {
        for token in BAD_TOKENS {
            let (app, _state, _store) = common::create_test_app();
            let response = app
                .oneshot(common::get(&format!("{}?token={}", path, token)))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "{} accepted token {:?}",
                path,
                token
            );
        }
    }
}

#[tokio::test]
async fn test_missing_token_rejected() {
    for path in [
        "/api/getAvailableApps",
        "/api/getUserApps",
        "/api/hackatime?userId=orpheus",
    ] {
        let (app, _state, _store) = common::create_test_app();
        let response = app.oneshot(common::get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
    }
}

#[tokio::test]
async fn test_bad_token_rejected_by_hackatime() {
    let (app, _state, _store) = common::create_test_app();
    let response = app
        .oneshot(common::get("/api/hackatime?userId=orpheus&token=short"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_token_rejected_by_body_endpoints() {
    let requests = [
        (
            "/api/addProject",
            json!({"token": "short", "projectName": "my-game"}),
        ),
        (
            "/api/updateProjectGithub",
            json!({"token": "bad token!!", "projectName": "neighborhood-game",
                   "githubLink": "https://github.com/hackclub/neighborhood"}),
        ),
        (
            "/api/postDevlog",
            json!({"demoVideo": "https://cdn.example.com/a.mp4",
                   "photoboothVideo": "https://cdn.example.com/b.mp4",
                   "description": "hi", "neighbor": "nope", "app": "Spaceship"}),
        ),
    ];

    for (path, body) in requests {
        let (app, _state, _store) = common::create_test_app();
        let response = app.oneshot(common::post_json(path, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);

        let body = common::body_json(response).await;
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid input format"));
    }
}

#[tokio::test]
async fn test_project_name_and_link_patterns() {
    let cases = [
        json!({"token": common::ORPHEUS_TOKEN, "projectName": "ab"}),
        json!({"token": common::ORPHEUS_TOKEN, "projectName": "a".repeat(51)}),
        json!({"token": common::ORPHEUS_TOKEN, "projectName": "bad;name"}),
        json!({"token": common::ORPHEUS_TOKEN, "projectName": "fine-name",
               "githubLink": "https://gitlab.com/a/b"}),
    ];

    for body in cases {
        let (app, _state, _store) = common::create_test_app();
        let response = app
            .oneshot(common::post_json("/api/addProject", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _state, _store) = common::create_test_app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/isAccountLinked")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_email_rejected() {
    for path in ["/api/isAccountLinked", "/api/sendOTPHacktendoSignup"] {
        let (app, _state, _store) = common::create_test_app();
        let response = app
            .oneshot(common::post_json(path, json!({"email": "not-an-email"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
    }
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let cases = [
        ("POST", "/api/getAvailableApps"),
        ("DELETE", "/api/getUserApps"),
        ("GET", "/api/addProject"),
        ("PUT", "/api/updateProjectGithub"),
        ("POST", "/api/hackatime"),
        ("GET", "/api/isAccountLinked"),
        ("GET", "/api/sendOTPHacktendoSignup"),
        ("POST", "/api/getLatestPost"),
        ("GET", "/api/postDevlog"),
    ];

    for (method, path) in cases {
        let (app, _state, _store) = common::create_test_app();
        let request = axum::http::Request::builder()
            .method(method)
            .uri(path)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{} {}",
            method,
            path
        );
        let body = common::body_json(response).await;
        assert_eq!(body["message"], "Method not allowed");
    }
}
