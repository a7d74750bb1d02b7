//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use masquerade_core::clock::Clock;
use masquerade_core::rng::DeterministicRng;
use masquerade_store::pg_hint_store::PgHintStore;
use masquerade_store::pg_roster::PgPlayerRoster;
use masquerade_store::pg_session_repository::PgSessionRepository;
use masquerade_test_support::{FixedClock, MockRng};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use masquerade_api::build_router;
use masquerade_api::extract::MODERATOR_HEADER;
use masquerade_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over the real `PostgreSQL` adapters with a
/// fixed clock and the identity shuffle.
pub fn build_test_app(pool: PgPool) -> Router {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let app_state = AppState::new(
        fixed_clock(),
        rng,
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(PgPlayerRoster::new(pool.clone())),
        Arc::new(PgHintStore::new(pool)),
    );
    build_router(app_state)
}

/// A seeded group: its id, owner, and eligible players in join order.
pub struct SeededGroup {
    pub group_id: Uuid,
    pub moderator_id: Uuid,
    pub players: Vec<Uuid>,
}

/// Inserts a group with `players` eligible players, each with a name,
/// a complete profile, and hints `"<name> hint <n>"`.
pub async fn seed_group(pool: &PgPool, players: usize) -> SeededGroup {
    let group_id = Uuid::new_v4();
    let moderator_id = Uuid::new_v4();
    sqlx::query("INSERT INTO groups (id, name, owner_id) VALUES ($1, 'Team offsite', $2)")
        .bind(group_id)
        .bind(moderator_id)
        .execute(pool)
        .await
        .unwrap();

    let mut ids = Vec::with_capacity(players);
    for n in 0..players {
        let user_id = Uuid::new_v4();
        let name = format!("Guest {}", n + 1);
        let joined = i32::try_from(n).unwrap();
        sqlx::query("INSERT INTO user_profiles (id, full_name) VALUES ($1, $2)")
            .bind(user_id)
            .bind(&name)
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO profiles (group_id, user_id, answers, is_complete, hints_generated, created_at)
             VALUES ($1, $2, $3, TRUE, TRUE, TIMESTAMPTZ '2026-01-01 00:00:00+00' + make_interval(mins => $4))",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(serde_json::json!({ "superpower": format!("power {}", n + 1) }))
        .bind(joined)
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO hints (group_id, user_id, hint1, hint2, hint3) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(format!("{name} hint 1"))
        .bind(format!("{name} hint 2"))
        .bind(format!("{name} hint 3"))
        .execute(pool)
        .await
        .unwrap();
        ids.push(user_id);
    }

    SeededGroup {
        group_id,
        moderator_id,
        players: ids,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request as `moderator_id` and return the response.
pub async fn post_as(
    app: Router,
    moderator_id: Uuid,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header(MODERATOR_HEADER, moderator_id.to_string())
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
