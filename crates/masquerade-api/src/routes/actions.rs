//! Single-endpoint game control: one tagged `GameAction` per request.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use masquerade_game::application::dispatch::{self, GameAction, GameOutcome};

use crate::error::ApiError;
use crate::extract::moderator_id;
use crate::state::AppState;

/// POST /game-control
#[instrument(
    skip_all,
    fields(group_id = %action.group_id(), action = action.name())
)]
async fn game_control(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(action): Json<GameAction>,
) -> Result<Json<GameOutcome>, ApiError> {
    // Status is open to viewers; the caller id is ignored for it.
    let caller = match action {
        GameAction::Status { .. } => Uuid::nil(),
        _ => moderator_id(&headers)?,
    };
    let correlation_id = Uuid::new_v4();

    info!(%correlation_id, "handling game control action");

    let outcome = dispatch::dispatch(action, caller, correlation_id, state.services()).await?;

    Ok(Json(outcome))
}

/// Returns the router for the game control endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/game-control", post(game_control))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use masquerade_core::clock::Clock;
    use masquerade_core::rng::DeterministicRng;
    use masquerade_test_support::{
        FixedClock, InMemorySessionRepository, MockRng, StaticHintStore, StaticRoster,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::extract::MODERATOR_HEADER;

    fn app(group_id: Uuid, moderator_id: Uuid, players: &[Uuid]) -> Router {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        let state = AppState::new(
            clock,
            rng,
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(StaticRoster::new().with_group(group_id, moderator_id, players)),
            Arc::new(StaticHintStore::new().with_generated(group_id, players)),
        );
        router().with_state(state)
    }

    async fn control(app: &Router, moderator_id: Option<Uuid>, body: &Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/game-control")
            .header("content-type", "application/json");
        if let Some(id) = moderator_id {
            builder = builder.header(MODERATOR_HEADER, id.to_string());
        }
        let request = builder
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_game_control_start_and_next() {
        // Arrange
        let group_id = Uuid::new_v4();
        let moderator_id = Uuid::new_v4();
        let players = [Uuid::new_v4(), Uuid::new_v4()];
        let app = app(group_id, moderator_id, &players);

        // Act
        let (start_status, started) = control(
            &app,
            Some(moderator_id),
            &json!({ "action": "start", "group_id": group_id }),
        )
        .await;
        let (next_status, next) = control(
            &app,
            Some(moderator_id),
            &json!({ "action": "next", "group_id": group_id }),
        )
        .await;

        // Assert
        assert_eq!(start_status, StatusCode::OK);
        assert_eq!(started["outcome"], "started");
        assert_eq!(started["player_count"], 2);
        assert_eq!(next_status, StatusCode::OK);
        assert_eq!(next["outcome"], "turn_advanced");
        assert_eq!(next["current_player_id"], players[0].to_string());
    }

    #[tokio::test]
    async fn test_game_control_status_without_header() {
        let group_id = Uuid::new_v4();
        let app = app(group_id, Uuid::new_v4(), &[]);

        let (status, json) = control(
            &app,
            None,
            &json!({ "action": "status", "group_id": group_id }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["outcome"], "status");
        assert_eq!(json["in_progress"], false);
    }

    #[tokio::test]
    async fn test_game_control_mutation_without_header_returns_400() {
        let group_id = Uuid::new_v4();
        let app = app(group_id, Uuid::new_v4(), &[Uuid::new_v4(), Uuid::new_v4()]);

        let (status, json) = control(
            &app,
            None,
            &json!({ "action": "start", "group_id": group_id }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_game_control_unknown_action_is_rejected() {
        let app = app(Uuid::new_v4(), Uuid::new_v4(), &[]);

        let (status, _) = control(
            &app,
            Some(Uuid::new_v4()),
            &json!({ "action": "shuffle_again", "group_id": Uuid::new_v4() }),
        )
        .await;

        assert!(status.is_client_error());
    }
}
