//! Integration tests for single-track games over `PostgreSQL`.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

fn game_uri(group_id: Uuid, action: &str) -> String {
    format!("/api/v1/groups/{group_id}/game/{action}")
}

async fn stored_version(pool: &PgPool, group_id: Uuid) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT version FROM game_sessions WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_three_player_game_round_trip(pool: PgPool) {
    // Arrange
    let group = common::seed_group(&pool, 3).await;
    let app = common::build_test_app(pool.clone());
    let moderator = group.moderator_id;
    let empty = json!({});

    let (status, started) =
        common::post_as(app.clone(), moderator, &game_uri(group.group_id, "start"), &empty).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["player_count"], 3);

    for (turn, player_id) in group.players.iter().enumerate() {
        // Act
        let (_, next) =
            common::post_as(app.clone(), moderator, &game_uri(group.group_id, "next"), &empty)
                .await;
        let (_, hint) = common::post_as(
            app.clone(),
            moderator,
            &game_uri(group.group_id, "hint"),
            &json!({ "hint_index": 1 }),
        )
        .await;
        let (_, wrong) = common::post_as(
            app.clone(),
            moderator,
            &game_uri(group.group_id, "verify"),
            &json!({ "guess_player_id": group.players[(turn + 1) % 3] }),
        )
        .await;
        let (_, right) = common::post_as(
            app.clone(),
            moderator,
            &game_uri(group.group_id, "verify"),
            &json!({ "guess_player_id": player_id }),
        )
        .await;
        let (status, revealed) =
            common::post_as(app.clone(), moderator, &game_uri(group.group_id, "reveal"), &empty)
                .await;

        // Assert
        assert_eq!(next["current_player_id"], player_id.to_string());
        assert_eq!(hint["hint"], format!("Guest {} hint 1", turn + 1));
        assert_eq!(wrong["correct"], false);
        assert_eq!(right["correct"], true);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(revealed["player"]["display_name"], format!("Guest {}", turn + 1));
        assert_eq!(
            revealed["player"]["profile_highlights"]["superpower"],
            format!("power {}", turn + 1)
        );
        assert_eq!(revealed["game_ended"], turn == 2);
    }

    let (status, view) =
        common::get_json(app.clone(), &game_uri(group.group_id, "status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["in_progress"], false);
    assert_eq!(view["revealed_count"], 3);
    assert_eq!(view["total_players"], 3);
    assert_eq!(view["revealed_players"][0]["display_name"], "Guest 1");
    assert!(view["ended_at"].is_string());

    let (status, json) =
        common::post_as(app, moderator, &game_uri(group.group_id, "next"), &empty).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "all_players_revealed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_start_with_single_eligible_player_creates_no_session(pool: PgPool) {
    let group = common::seed_group(&pool, 1).await;
    let app = common::build_test_app(pool.clone());

    let (status, json) = common::post_as(
        app.clone(),
        group.moderator_id,
        &game_uri(group.group_id, "start"),
        &json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "insufficient_players");
    let (_, view) = common::get_json(app, &game_uri(group.group_id, "status")).await;
    assert_eq!(view["in_progress"], false);
    assert_eq!(view["total_players"], 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_invalid_hint_index_leaves_session_unchanged(pool: PgPool) {
    let group = common::seed_group(&pool, 2).await;
    let app = common::build_test_app(pool.clone());
    let moderator = group.moderator_id;
    let empty = json!({});
    common::post_as(app.clone(), moderator, &game_uri(group.group_id, "start"), &empty).await;
    common::post_as(app.clone(), moderator, &game_uri(group.group_id, "next"), &empty).await;
    let before = stored_version(&pool, group.group_id).await;

    let (status, json) = common::post_as(
        app.clone(),
        moderator,
        &game_uri(group.group_id, "hint"),
        &json!({ "hint_index": 5 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_hint_index");
    assert_eq!(stored_version(&pool, group.group_id).await, before);
    let (_, view) = common::get_json(app, &game_uri(group.group_id, "status")).await;
    assert_eq!(view["current_hint_index"], 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_status_for_unknown_group_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, &game_uri(Uuid::new_v4(), "status")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "group_not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_end_keeps_reveal_history(pool: PgPool) {
    let group = common::seed_group(&pool, 3).await;
    let app = common::build_test_app(pool);
    let moderator = group.moderator_id;
    let empty = json!({});
    for action in ["start", "next", "reveal"] {
        common::post_as(app.clone(), moderator, &game_uri(group.group_id, action), &empty).await;
    }

    let (status, ended) =
        common::post_as(app.clone(), moderator, &game_uri(group.group_id, "end"), &empty).await;
    let (_, again) =
        common::post_as(app.clone(), moderator, &game_uri(group.group_id, "end"), &empty).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["already_ended"], false);
    assert_eq!(ended["revealed_count"], 1);
    assert_eq!(again["already_ended"], true);
    let (_, view) = common::get_json(app, &game_uri(group.group_id, "status")).await;
    assert_eq!(view["in_progress"], false);
    assert_eq!(view["revealed_count"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_game_control_endpoint_drives_dual_mode(pool: PgPool) {
    let group = common::seed_group(&pool, 2).await;
    let app = common::build_test_app(pool);

    let (status, started) = common::post_as(
        app.clone(),
        group.moderator_id,
        "/api/v1/game-control",
        &json!({ "action": "start_dual_mode", "group_id": group.group_id }),
    )
    .await;
    let (_, round) = common::post_as(
        app.clone(),
        group.moderator_id,
        "/api/v1/game-control",
        &json!({ "action": "reveal_dual", "group_id": group.group_id }),
    )
    .await;
    let (_, view) = common::post_json(
        app,
        "/api/v1/game-control",
        &json!({ "action": "status", "group_id": group.group_id }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["mode"], "dual");
    assert_eq!(round["outcome"], "round_revealed");
    assert_eq!(round["game_ended"], true);
    assert_eq!(view["outcome"], "status");
    assert_eq!(view["mode"], "dual");
    assert_eq!(view["revealed_count"], 2);
}
