// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use neighborhood::config::Config;
use neighborhood::db::MemoryStore;
use neighborhood::routes::create_router;
use neighborhood::AppState;
use serde_json::{json, Value};
use std::sync::Arc;

pub const ORPHEUS_TOKEN: &str = "tok_orpheus_123";
pub const HEIDI_TOKEN: &str = "tok_heidi_4567";
/// Well-formed but unknown
pub const STRANGER_TOKEN: &str = "tok_nobody_000";

/// Store seeded with two neighbors, a handful of apps, one project and two posts.
#[allow(dead_code)]
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();

    store.insert(
        "neighbors",
        "recN1",
        json!({"token": ORPHEUS_TOKEN, "email": "orpheus@hackclub.com", "Full Name": "Orpheus"}),
    );
    store.insert(
        "neighbors",
        "recN2",
        json!({"token": HEIDI_TOKEN, "email": "heidi@hackclub.com", "Full Name": "Heidi <3"}),
    );

    store.insert(
        "Apps",
        "recA1",
        json!({"Name": "Spaceship", "Neighbors": ["recN1"], "is_joinable": true,
               "createdAt": "2025-05-01T00:00:00Z"}),
    );
    store.insert(
        "Apps",
        "recA2",
        json!({"Name": "Garden", "Neighbors": ["recN2", "recN3", "recN4"], "is_joinable": true}),
    );
    store.insert(
        "Apps",
        "recA3",
        json!({"Name": "Lighthouse", "Neighbors": ["recN2"], "is_joinable": true}),
    );
    store.insert(
        "Apps",
        "recA4",
        json!({"Name": "Vault", "Neighbors": [], "is_joinable": false}),
    );
    store.insert(
        "Apps",
        "recA5",
        json!({"Name": "Puzzle", "Neighbors": ["recN2"], "isHacktendo": true}),
    );
    store.insert(
        "Apps",
        "recA6",
        json!({"Name": "Racer", "Neighbors": ["recN1"], "isHacktendo": true}),
    );

    store.insert(
        "hackatimeProjects",
        "recP1",
        json!({"name": "neighborhood-game", "githubLink": "", "neighbor": ["recN1"],
               "email": "orpheus@hackclub.com"}),
    );

    store.insert(
        "Posts",
        "recPost0",
        json!({"description": "older", "app": ["recA2"], "neighbor": ["recN2"],
               "createdAt": "2025-05-01T10:00:00Z"}),
    );
    store.insert(
        "Posts",
        "recPost1",
        json!({"description": "<script>alert('x')</script>", "app": ["recA1"],
               "neighbor": ["recN2"], "createdAt": "2025-05-02T10:00:00Z",
               "tags": ["a&b", {"note": "`tick`"}]}),
    );

    store
}

/// Create a test app over `store` with `config`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config, store: MemoryStore) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_store(config, Arc::new(store)));
    (create_router(state.clone()), state)
}

/// Create a test app over the seeded store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    let store = seeded_store();
    let (app, state) = create_test_app_with(Config::test_default(), store.clone());
    (app, state, store)
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
