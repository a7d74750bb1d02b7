//! Routes for dual-track games.

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use masquerade_game::application::command_handlers::{
    self, GameStarted, GuessChecked, HintShown, RoundAdvanced, RoundRevealed,
};
use masquerade_game::domain::aggregates::Side;
use masquerade_game::domain::commands;

use crate::error::ApiError;
use crate::extract::Moderator;
use crate::state::AppState;

/// Request body for POST /dual/hint.
#[derive(Debug, Deserialize)]
pub struct DualHintRequest {
    /// The targeted side.
    pub side: Side,
    /// Hint to disclose (1-3); omitted for the next undisclosed one.
    #[serde(default)]
    pub hint_index: Option<i64>,
}

/// Request body for POST /dual/verify.
#[derive(Debug, Deserialize)]
pub struct DualVerifyRequest {
    /// The targeted side.
    pub side: Side,
    /// The guessed player.
    pub guess_player_id: Uuid,
}

/// POST /groups/{group_id}/game/dual/start
#[instrument(skip_all, fields(group_id = %group_id))]
async fn start_dual_mode(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
) -> Result<Json<GameStarted>, ApiError> {
    let command = commands::StartDualMode {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_dual_mode command");

    let started = command_handlers::handle_start_dual_mode(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(started))
}

/// POST /groups/{group_id}/game/dual/next
#[instrument(skip_all, fields(group_id = %group_id))]
async fn next_dual_round(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
) -> Result<Json<RoundAdvanced>, ApiError> {
    let command = commands::NextDualRound {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
    };

    info!(correlation_id = %command.correlation_id, "handling next_dual_round command");

    let advanced = command_handlers::handle_next_dual_round(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(advanced))
}

/// POST /groups/{group_id}/game/dual/hint
#[instrument(skip_all, fields(group_id = %group_id, side = request.side.as_str()))]
async fn get_dual_hint(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
    Json(request): Json<DualHintRequest>,
) -> Result<Json<HintShown>, ApiError> {
    let command = commands::GetDualHint {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
        side: request.side,
        hint_index: request.hint_index,
    };

    info!(correlation_id = %command.correlation_id, "handling get_dual_hint command");

    let shown = command_handlers::handle_get_dual_hint(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &*state.roster,
        &*state.hint_store,
    )
    .await?;

    Ok(Json(shown))
}

/// POST /groups/{group_id}/game/dual/verify
#[instrument(skip_all, fields(group_id = %group_id, side = request.side.as_str()))]
async fn verify_dual_guess(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
    Json(request): Json<DualVerifyRequest>,
) -> Result<Json<GuessChecked>, ApiError> {
    let command = commands::VerifyDualGuess {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
        side: request.side,
        guess_player_id: request.guess_player_id,
    };

    info!(correlation_id = %command.correlation_id, "handling verify_dual_guess command");

    let checked = command_handlers::handle_verify_dual_guess(
        &command,
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(checked))
}

/// POST /groups/{group_id}/game/dual/reveal
#[instrument(skip_all, fields(group_id = %group_id))]
async fn reveal_dual_round(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Moderator(moderator_id): Moderator,
) -> Result<Json<RoundRevealed>, ApiError> {
    let command = commands::RevealDualRound {
        correlation_id: Uuid::new_v4(),
        group_id,
        moderator_id,
    };

    info!(correlation_id = %command.correlation_id, "handling reveal_dual_round command");

    let revealed = command_handlers::handle_reveal_dual_round(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &*state.roster,
    )
    .await?;

    Ok(Json(revealed))
}

/// Returns the router for dual-track games.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups/{group_id}/game/dual/start", post(start_dual_mode))
        .route("/groups/{group_id}/game/dual/next", post(next_dual_round))
        .route("/groups/{group_id}/game/dual/hint", post(get_dual_hint))
        .route("/groups/{group_id}/game/dual/verify", post(verify_dual_guess))
        .route("/groups/{group_id}/game/dual/reveal", post(reveal_dual_round))
}
