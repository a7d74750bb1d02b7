//! Routes for single-track games and the status projection.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use masquerade_game::application::command_handlers::{
    self, GameEnded, GameStarted, GuessChecked, HintShown, PlayerRevealed, TurnAdvanced,
};
use masquerade_game::application::query_handlers::{self, GameStatusView};
use masquerade_game::domain::commands;

use crate::error::ApiError;
use crate::extract::Moderator;
use crate::state::AppState;

/// Request body for POST /hint.
#[derive(Debug, Deserialize)]
pub struct HintRequest {
    /// Hint to disclose (1-3); omitted for the next undisclosed one.
    #[serde(default)]
    pub hint_index: Option<i64>,
}

/// Request body for POST /verify.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// The guessed player.
    pub guess_player_id: Uuid,
}

/// POST /groups/{group_id}/game/start
#[instrument(skip_all, fields(group_id = %group_id))]
async fn start_game(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
) -> Result<Json<GameStarted>, ApiError> {
    let command = commands::StartGame {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_game command");

    let started = command_handlers::handle_start_game(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(started))
}

/// POST /groups/{group_id}/game/next
#[instrument(skip_all, fields(group_id = %group_id))]
async fn next_turn(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
) -> Result<Json<TurnAdvanced>, ApiError> {
    let command = commands::NextTurn {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
    };

    info!(correlation_id = %command.correlation_id, "handling next_turn command");

    let advanced = command_handlers::handle_next_turn(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(advanced))
}

/// POST /groups/{group_id}/game/hint
#[instrument(skip_all, fields(group_id = %group_id))]
async fn get_hint(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
    Json(request): Json<HintRequest>,
) -> Result<Json<HintShown>, ApiError> {
    let command = commands::GetHint {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
        hint_index: request.hint_index,
    };

    info!(correlation_id = %command.correlation_id, "handling get_hint command");

    let shown = command_handlers::handle_get_hint(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &*state.roster,
        &*state.hint_store,
    )
    .await?;

    Ok(Json(shown))
}

/// POST /groups/{group_id}/game/verify
#[instrument(skip_all, fields(group_id = %group_id))]
async fn verify_guess(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<GuessChecked>, ApiError> {
    let command = commands::VerifyGuess {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
        guess_player_id: request.guess_player_id,
    };

    info!(correlation_id = %command.correlation_id, "handling verify_guess command");

    let checked = command_handlers::handle_verify_guess(
        &command,
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(checked))
}

/// POST /groups/{group_id}/game/reveal
#[instrument(skip_all, fields(group_id = %group_id))]
async fn reveal_player(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
) -> Result<Json<PlayerRevealed>, ApiError> {
    let command = commands::RevealPlayer {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
    };

    info!(correlation_id = %command.correlation_id, "handling reveal_player command");

    let revealed = command_handlers::handle_reveal_player(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(revealed))
}

/// POST /groups/{group_id}/game/end
#[instrument(skip_all, fields(group_id = %group_id))]
async fn end_game(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
) -> Result<Json<GameEnded>, ApiError> {
    let command = commands::EndGame {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
    };

    info!(correlation_id = %command.correlation_id, "handling end_game command");

    let ended = command_handlers::handle_end_game(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(ended))
}

/// GET /groups/{group_id}/game/status
#[instrument(skip_all, fields(group_id = %group_id))]
async fn game_status(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GameStatusView>, ApiError> {
    let view =
        query_handlers::get_game_status(group_id, &*state.session_repository, &*state.roster)
            .await?;
    Ok(Json(view))
}

/// Returns the router for single-track games.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups/{group_id}/game/start", post(start_game))
        .route("/groups/{group_id}/game/next", post(next_turn))
        .route("/groups/{group_id}/game/hint", post(get_hint))
        .route("/groups/{group_id}/game/verify", post(verify_guess))
        .route("/groups/{group_id}/game/reveal", post(reveal_player))
        .route("/groups/{group_id}/game/end", post(end_game))
        .route("/groups/{group_id}/game/status", get(game_status))
}
