//! Command handlers for the game session controller.
//!
//! Each handler is one read-modify-write of the group's session row: check
//! the caller moderates the group, load the row, run the domain method on
//! the in-memory copy, and write it back conditioned on the version read.
//! A handler that fails never writes.

use std::sync::Mutex;

use masquerade_core::clock::Clock;
use masquerade_core::command::Command;
use masquerade_core::error::DomainError;
use masquerade_core::hints::HintStore;
use masquerade_core::repository::{SessionRepository, StoredSession};
use masquerade_core::rng::DeterministicRng;
use masquerade_core::roster::{PlayerIdentity, PlayerRoster};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::aggregates::{GameMode, GameSession, Side};
use crate::domain::commands::{
    EndGame, GetDualHint, GetHint, NextDualRound, NextTurn, RevealDualRound, RevealPlayer,
    StartDualMode, StartGame, VerifyDualGuess, VerifyGuess,
};

/// Result of starting a game.
#[derive(Debug, Clone, Serialize)]
pub struct GameStarted {
    /// The group whose game started.
    pub group_id: Uuid,
    /// Single or dual.
    pub mode: GameMode,
    /// Number of players in the turn order.
    pub player_count: usize,
}

/// Result of advancing the single track.
#[derive(Debug, Clone, Serialize)]
pub struct TurnAdvanced {
    /// The new current player.
    pub current_player_id: Uuid,
    /// Unrevealed players, the new current player included.
    pub remaining_players: usize,
}

/// Result of drawing a dual round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundAdvanced {
    /// The player now on the left track.
    pub left_player_id: Option<Uuid>,
    /// The player now on the right track.
    pub right_player_id: Option<Uuid>,
    /// Unrevealed players, the new current players included.
    pub remaining_players: usize,
}

/// A disclosed hint.
#[derive(Debug, Clone, Serialize)]
pub struct HintShown {
    /// The dual-mode side, or `None` for single sessions.
    pub side: Option<Side>,
    /// The hint text.
    pub hint: String,
    /// The hint's index (1-3).
    pub hint_index: u8,
}

/// Outcome of a guess check.
#[derive(Debug, Clone, Serialize)]
pub struct GuessChecked {
    /// The dual-mode side, or `None` for single sessions.
    pub side: Option<Side>,
    /// Whether the guess named the current player.
    pub correct: bool,
}

/// Result of revealing the current player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRevealed {
    /// Who it was.
    pub player: PlayerIdentity,
    /// Whether everyone has now been revealed.
    pub game_ended: bool,
    /// Players revealed so far.
    pub revealed_count: usize,
    /// Players in the turn order.
    pub total_players: usize,
}

/// Result of revealing a dual round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundRevealed {
    /// Who was on the left track.
    pub left: Option<PlayerIdentity>,
    /// Who was on the right track.
    pub right: Option<PlayerIdentity>,
    /// Whether everyone has now been revealed.
    pub game_ended: bool,
    /// Players revealed so far.
    pub revealed_count: usize,
    /// Players in the turn order.
    pub total_players: usize,
}

/// Result of ending a game.
#[derive(Debug, Clone, Serialize)]
pub struct GameEnded {
    /// True if nothing changed because the game was not running.
    pub already_ended: bool,
    /// Players revealed before the end.
    pub revealed_count: usize,
    /// Players in the turn order.
    pub total_players: usize,
}

fn to_stored_session(
    session: &GameSession,
    clock: &dyn Clock,
) -> Result<StoredSession, DomainError> {
    let state = serde_json::to_value(session)
        .map_err(|e| DomainError::Infrastructure(format!("session serialization failed: {e}")))?;
    Ok(StoredSession {
        group_id: session.group_id,
        version: session.version + 1,
        state,
        updated_at: clock.now(),
    })
}

/// Rebuilds a `GameSession` from its stored row.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the state does not deserialize
/// or violates a session invariant.
pub(crate) fn reconstitute(stored: &StoredSession) -> Result<GameSession, DomainError> {
    let mut session: GameSession = serde_json::from_value(stored.state.clone()).map_err(|e| {
        DomainError::Infrastructure(format!("session deserialization failed: {e}"))
    })?;
    if session.group_id != stored.group_id {
        return Err(DomainError::Infrastructure(format!(
            "session row for group {} holds group {}",
            stored.group_id, session.group_id
        )));
    }
    session.version = stored.version;
    session.validate()?;
    Ok(session)
}

pub(crate) async fn load_session(
    group_id: Uuid,
    repo: &dyn SessionRepository,
) -> Result<Option<GameSession>, DomainError> {
    repo.load_session(group_id)
        .await?
        .as_ref()
        .map(reconstitute)
        .transpose()
}

async fn persist(
    session: &mut GameSession,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
) -> Result<(), DomainError> {
    let stored = to_stored_session(session, clock)?;
    if let Err(err) = repo.save_session(session.version, &stored).await {
        if matches!(err, DomainError::Conflict { .. }) {
            warn!(group_id = %session.group_id, error = %err, "lost session write race");
        }
        return Err(err);
    }
    session.version = stored.version;
    Ok(())
}

async fn authorize(
    group_id: Uuid,
    moderator_id: Uuid,
    roster: &dyn PlayerRoster,
) -> Result<(), DomainError> {
    match roster.group_moderator(group_id).await? {
        None => Err(DomainError::NotFound(group_id)),
        Some(owner) if owner == moderator_id => Ok(()),
        Some(_) => Err(DomainError::Forbidden {
            group_id,
            caller: moderator_id,
        }),
    }
}

pub(crate) async fn resolve_identity(
    group_id: Uuid,
    player_id: Uuid,
    roster: &dyn PlayerRoster,
) -> Result<PlayerIdentity, DomainError> {
    Ok(roster
        .get_player_identity(group_id, player_id)
        .await?
        .unwrap_or_else(|| PlayerIdentity::anonymous(player_id)))
}

async fn start_session(
    command: &dyn Command,
    moderator_id: Uuid,
    mode: GameMode,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<GameStarted, DomainError> {
    let group_id = command.group_id();
    authorize(group_id, moderator_id, roster).await?;

    // Starting discards any previous session, but still writes against its version.
    let previous_version = repo
        .load_session(group_id)
        .await?
        .map_or(0, |stored| stored.version);
    let eligible = roster.list_eligible_players(group_id).await?;

    // Lock RNG only for the synchronous domain method, never across an await.
    let mut session = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        GameSession::start(group_id, &eligible, mode, &mut *rng_guard, clock)?
    };
    session.version = previous_version;

    persist(&mut session, clock, repo).await?;

    info!(
        %group_id,
        correlation_id = %command.correlation_id(),
        mode = mode.as_str(),
        players = session.player_order().len(),
        "game started"
    );

    Ok(GameStarted {
        group_id,
        mode,
        player_count: session.player_order().len(),
    })
}

/// Handles the `StartGame` command: snapshots the eligible players, shuffles
/// them into a new single-track session, and overwrites any prior session.
///
/// # Errors
///
/// Returns `NotFound`/`Forbidden` for an unknown group or caller,
/// `InsufficientPlayers` with fewer than two eligible players, and
/// `Conflict` if the row changed since it was read.
pub async fn handle_start_game(
    command: &StartGame,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<GameStarted, DomainError> {
    start_session(
        command,
        command.moderator_id,
        GameMode::Single,
        clock,
        rng,
        repo,
        roster,
    )
    .await
}

/// Handles the `StartDualMode` command: as [`handle_start_game`], with the
/// first two players of the order placed on the left and right tracks.
///
/// # Errors
///
/// Same as [`handle_start_game`].
pub async fn handle_start_dual_mode(
    command: &StartDualMode,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<GameStarted, DomainError> {
    start_session(
        command,
        command.moderator_id,
        GameMode::Dual,
        clock,
        rng,
        repo,
        roster,
    )
    .await
}

/// Handles the `NextTurn` command: makes the first unrevealed player current.
///
/// # Errors
///
/// Returns `NoActiveSession`, `AllPlayersRevealed`, `TurnAlreadyActive`,
/// `WrongMode`, or `Conflict`.
pub async fn handle_next_turn(
    command: &NextTurn,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<TurnAdvanced, DomainError> {
    authorize(command.group_id, command.moderator_id, roster).await?;
    let mut session = load_session(command.group_id, repo)
        .await?
        .ok_or(DomainError::NoActiveSession(command.group_id))?;

    let current_player_id = session.next_turn()?;
    persist(&mut session, clock, repo).await?;

    info!(
        group_id = %command.group_id,
        correlation_id = %command.correlation_id,
        "next player drawn"
    );

    Ok(TurnAdvanced {
        current_player_id,
        remaining_players: session.remaining_count(),
    })
}

/// Handles the `NextDualRound` command: draws two distinct unrevealed
/// players onto the dual tracks.
///
/// # Errors
///
/// Same as [`handle_next_turn`].
pub async fn handle_next_dual_round(
    command: &NextDualRound,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<RoundAdvanced, DomainError> {
    authorize(command.group_id, command.moderator_id, roster).await?;
    let mut session = load_session(command.group_id, repo)
        .await?
        .ok_or(DomainError::NoActiveSession(command.group_id))?;

    let assignment = session.next_round()?;
    persist(&mut session, clock, repo).await?;

    info!(
        group_id = %command.group_id,
        correlation_id = %command.correlation_id,
        "next dual round drawn"
    );

    Ok(RoundAdvanced {
        left_player_id: assignment.left,
        right_player_id: assignment.right,
        remaining_players: session.remaining_count(),
    })
}

#[allow(clippy::too_many_arguments)]
async fn disclose(
    group_id: Uuid,
    moderator_id: Uuid,
    side: Option<Side>,
    requested: Option<i64>,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
    hints: &dyn HintStore,
) -> Result<HintShown, DomainError> {
    authorize(group_id, moderator_id, roster).await?;
    let mut session = load_session(group_id, repo)
        .await?
        .ok_or(DomainError::NoCurrentPlayer)?;

    let disclosure = session.disclose_hint(side, requested)?;
    let hint_set = hints
        .get_hints(group_id, disclosure.player_id)
        .await?
        .ok_or(DomainError::HintsNotFound(disclosure.player_id))?;
    let hint = hint_set
        .hint(disclosure.hint_index)
        .ok_or(DomainError::InvalidHintIndex(disclosure.hint_index.into()))?
        .to_owned();

    if disclosure.advanced {
        persist(&mut session, clock, repo).await?;
    }

    debug!(
        %group_id,
        side = side.map(Side::as_str),
        hint_index = disclosure.hint_index,
        advanced = disclosure.advanced,
        "hint disclosed"
    );

    Ok(HintShown {
        side,
        hint,
        hint_index: disclosure.hint_index,
    })
}

/// Handles the `GetHint` command: returns a hint of the current player and
/// raises the disclosed-hint watermark (never lowers it).
///
/// # Errors
///
/// Returns `NoCurrentPlayer`, `InvalidHintIndex`, `HintsNotFound`,
/// `WrongMode`, or `Conflict`.
pub async fn handle_get_hint(
    command: &GetHint,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
    hints: &dyn HintStore,
) -> Result<HintShown, DomainError> {
    disclose(
        command.group_id,
        command.moderator_id,
        None,
        command.hint_index,
        clock,
        repo,
        roster,
        hints,
    )
    .await
}

/// Handles the `GetDualHint` command: [`handle_get_hint`] scoped to one side.
///
/// # Errors
///
/// Same as [`handle_get_hint`].
pub async fn handle_get_dual_hint(
    command: &GetDualHint,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
    hints: &dyn HintStore,
) -> Result<HintShown, DomainError> {
    disclose(
        command.group_id,
        command.moderator_id,
        Some(command.side),
        command.hint_index,
        clock,
        repo,
        roster,
        hints,
    )
    .await
}

async fn check_guess(
    group_id: Uuid,
    moderator_id: Uuid,
    side: Option<Side>,
    guess_player_id: Uuid,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<GuessChecked, DomainError> {
    authorize(group_id, moderator_id, roster).await?;
    let session = load_session(group_id, repo)
        .await?
        .ok_or(DomainError::NoCurrentPlayer)?;

    let correct = session.verify_guess(side, guess_player_id)?;
    debug!(%group_id, side = side.map(Side::as_str), correct, "guess checked");

    Ok(GuessChecked { side, correct })
}

/// Handles the `VerifyGuess` command. Read-only: the guess is neither
/// recorded nor does it advance the game.
///
/// # Errors
///
/// Returns `NoCurrentPlayer` or `WrongMode`.
pub async fn handle_verify_guess(
    command: &VerifyGuess,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<GuessChecked, DomainError> {
    check_guess(
        command.group_id,
        command.moderator_id,
        None,
        command.guess_player_id,
        repo,
        roster,
    )
    .await
}

/// Handles the `VerifyDualGuess` command: [`handle_verify_guess`] scoped to
/// one side.
///
/// # Errors
///
/// Same as [`handle_verify_guess`].
pub async fn handle_verify_dual_guess(
    command: &VerifyDualGuess,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<GuessChecked, DomainError> {
    check_guess(
        command.group_id,
        command.moderator_id,
        Some(command.side),
        command.guess_player_id,
        repo,
        roster,
    )
    .await
}

/// Handles the `RevealPlayer` command: appends the current player to the
/// revealed set, clears the turn, and ends the game in the same write when
/// nobody is left.
///
/// # Errors
///
/// Returns `NoCurrentPlayer`, `WrongMode`, or `Conflict`.
pub async fn handle_reveal_player(
    command: &RevealPlayer,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<PlayerRevealed, DomainError> {
    authorize(command.group_id, command.moderator_id, roster).await?;
    let mut session = load_session(command.group_id, repo)
        .await?
        .ok_or(DomainError::NoCurrentPlayer)?;

    let revealed = session.reveal_current(clock)?;
    let player = resolve_identity(command.group_id, revealed.player_id, roster).await?;
    persist(&mut session, clock, repo).await?;

    info!(
        group_id = %command.group_id,
        correlation_id = %command.correlation_id,
        player_id = %revealed.player_id,
        game_ended = revealed.game_ended,
        "player revealed"
    );

    Ok(PlayerRevealed {
        player,
        game_ended: revealed.game_ended,
        revealed_count: session.revealed_players().len(),
        total_players: session.player_order().len(),
    })
}

/// Handles the `RevealDualRound` command: reveals both tracks in one write.
///
/// # Errors
///
/// Returns `NoCurrentPlayer`, `SideInactive`, `WrongMode`, or `Conflict`.
pub async fn handle_reveal_dual_round(
    command: &RevealDualRound,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<RoundRevealed, DomainError> {
    authorize(command.group_id, command.moderator_id, roster).await?;
    let mut session = load_session(command.group_id, repo)
        .await?
        .ok_or(DomainError::NoCurrentPlayer)?;

    let round = session.reveal_round(clock)?;
    let left = match round.left {
        Some(player_id) => Some(resolve_identity(command.group_id, player_id, roster).await?),
        None => None,
    };
    let right = match round.right {
        Some(player_id) => Some(resolve_identity(command.group_id, player_id, roster).await?),
        None => None,
    };
    persist(&mut session, clock, repo).await?;

    info!(
        group_id = %command.group_id,
        correlation_id = %command.correlation_id,
        game_ended = round.game_ended,
        "dual round revealed"
    );

    Ok(RoundRevealed {
        left,
        right,
        game_ended: round.game_ended,
        revealed_count: session.revealed_players().len(),
        total_players: session.player_order().len(),
    })
}

/// Handles the `EndGame` command: stops the game without touching the
/// reveal history. Ending a game that is not running changes nothing.
///
/// # Errors
///
/// Returns `NotFound`/`Forbidden` or `Conflict`.
pub async fn handle_end_game(
    command: &EndGame,
    clock: &dyn Clock,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<GameEnded, DomainError> {
    authorize(command.group_id, command.moderator_id, roster).await?;
    let Some(mut session) = load_session(command.group_id, repo).await? else {
        return Ok(GameEnded {
            already_ended: true,
            revealed_count: 0,
            total_players: 0,
        });
    };

    let ended = session.end(clock);
    if ended {
        persist(&mut session, clock, repo).await?;
        info!(
            group_id = %command.group_id,
            correlation_id = %command.correlation_id,
            "game ended"
        );
    }

    Ok(GameEnded {
        already_ended: !ended,
        revealed_count: session.revealed_players().len(),
        total_players: session.player_order().len(),
    })
}
