//! Single-entry dispatch over the closed set of game actions.
//!
//! `GameAction` is the typed replacement for a free-form action string plus
//! payload: every variant carries exactly the parameters its handler needs,
//! and every handler result comes back as one `GameOutcome` variant.

use std::sync::Mutex;

use masquerade_core::clock::Clock;
use masquerade_core::error::DomainError;
use masquerade_core::hints::HintStore;
use masquerade_core::repository::SessionRepository;
use masquerade_core::rng::DeterministicRng;
use masquerade_core::roster::PlayerRoster;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::command_handlers::{
    self, GameEnded, GameStarted, GuessChecked, HintShown, PlayerRevealed, RoundAdvanced,
    RoundRevealed, TurnAdvanced,
};
use crate::application::query_handlers::{self, GameStatusView};
use crate::domain::aggregates::Side;
use crate::domain::commands::{
    EndGame, GetDualHint, GetHint, NextDualRound, NextTurn, RevealDualRound, RevealPlayer,
    StartDualMode, StartGame, VerifyDualGuess, VerifyGuess,
};

/// A moderator action against one group's game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GameAction {
    /// Start a single-track game.
    Start { group_id: Uuid },
    /// Start a dual-track game.
    StartDualMode { group_id: Uuid },
    /// Draw the next player.
    Next { group_id: Uuid },
    /// Draw the next dual round.
    NextDualRound { group_id: Uuid },
    /// Disclose a hint of the current player.
    GetHint {
        group_id: Uuid,
        hint_index: Option<i64>,
    },
    /// Disclose a hint on one side.
    GetDualHint {
        group_id: Uuid,
        side: Side,
        hint_index: Option<i64>,
    },
    /// Check a guess.
    Verify {
        group_id: Uuid,
        guess_player_id: Uuid,
    },
    /// Check a guess on one side.
    VerifyDualGuess {
        group_id: Uuid,
        side: Side,
        guess_player_id: Uuid,
    },
    /// Reveal the current player.
    Reveal { group_id: Uuid },
    /// Reveal both sides.
    RevealDual { group_id: Uuid },
    /// Force-terminate the game.
    End { group_id: Uuid },
    /// Read the status projection.
    Status { group_id: Uuid },
}

impl GameAction {
    /// Returns the group this action targets.
    #[must_use]
    pub fn group_id(&self) -> Uuid {
        match self {
            Self::Start { group_id }
            | Self::StartDualMode { group_id }
            | Self::Next { group_id }
            | Self::NextDualRound { group_id }
            | Self::GetHint { group_id, .. }
            | Self::GetDualHint { group_id, .. }
            | Self::Verify { group_id, .. }
            | Self::VerifyDualGuess { group_id, .. }
            | Self::Reveal { group_id }
            | Self::RevealDual { group_id }
            | Self::End { group_id }
            | Self::Status { group_id } => *group_id,
        }
    }

    /// Returns the wire name of the action.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::StartDualMode { .. } => "start_dual_mode",
            Self::Next { .. } => "next",
            Self::NextDualRound { .. } => "next_dual_round",
            Self::GetHint { .. } => "get_hint",
            Self::GetDualHint { .. } => "get_dual_hint",
            Self::Verify { .. } => "verify",
            Self::VerifyDualGuess { .. } => "verify_dual_guess",
            Self::Reveal { .. } => "reveal",
            Self::RevealDual { .. } => "reveal_dual",
            Self::End { .. } => "end",
            Self::Status { .. } => "status",
        }
    }
}

/// The typed result of a dispatched action.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GameOutcome {
    /// A game started.
    Started(GameStarted),
    /// A player was drawn.
    TurnAdvanced(TurnAdvanced),
    /// A dual round was drawn.
    RoundAdvanced(RoundAdvanced),
    /// A hint was disclosed.
    Hint(HintShown),
    /// A guess was checked.
    Guess(GuessChecked),
    /// A player was revealed.
    PlayerRevealed(PlayerRevealed),
    /// A dual round was revealed.
    RoundRevealed(RoundRevealed),
    /// The game was ended.
    Ended(GameEnded),
    /// The status projection.
    Status(GameStatusView),
}

/// The collaborators every handler draws from.
#[derive(Clone, Copy)]
pub struct GameServices<'a> {
    /// Time source.
    pub clock: &'a dyn Clock,
    /// Shuffle source for starts.
    pub rng: &'a Mutex<dyn DeterministicRng + Send>,
    /// The session rows.
    pub sessions: &'a dyn SessionRepository,
    /// Group membership and identities.
    pub roster: &'a dyn PlayerRoster,
    /// Player hints.
    pub hints: &'a dyn HintStore,
}

/// Runs `action` on behalf of `moderator_id`.
///
/// # Errors
///
/// Returns whatever the matching handler returns.
pub async fn dispatch(
    action: GameAction,
    moderator_id: Uuid,
    correlation_id: Uuid,
    services: GameServices<'_>,
) -> Result<GameOutcome, DomainError> {
    let GameServices {
        clock,
        rng,
        sessions,
        roster,
        hints,
    } = services;

    let outcome = match action {
        GameAction::Start { group_id } => {
            let command = StartGame {
                correlation_id,
                group_id,
                moderator_id,
            };
            GameOutcome::Started(
                command_handlers::handle_start_game(&command, clock, rng, sessions, roster).await?,
            )
        }
        GameAction::StartDualMode { group_id } => {
            let command = StartDualMode {
                correlation_id,
                group_id,
                moderator_id,
            };
            GameOutcome::Started(
                command_handlers::handle_start_dual_mode(&command, clock, rng, sessions, roster)
                    .await?,
            )
        }
        GameAction::Next { group_id } => {
            let command = NextTurn {
                correlation_id,
                group_id,
                moderator_id,
            };
            GameOutcome::TurnAdvanced(
                command_handlers::handle_next_turn(&command, clock, sessions, roster).await?,
            )
        }
        GameAction::NextDualRound { group_id } => {
            let command = NextDualRound {
                correlation_id,
                group_id,
                moderator_id,
            };
            GameOutcome::RoundAdvanced(
                command_handlers::handle_next_dual_round(&command, clock, sessions, roster)
                    .await?,
            )
        }
        GameAction::GetHint {
            group_id,
            hint_index,
        } => {
            let command = GetHint {
                correlation_id,
                group_id,
                moderator_id,
                hint_index,
            };
            GameOutcome::Hint(
                command_handlers::handle_get_hint(&command, clock, sessions, roster, hints)
                    .await?,
            )
        }
        GameAction::GetDualHint {
            group_id,
            side,
            hint_index,
        } => {
            let command = GetDualHint {
                correlation_id,
                group_id,
                moderator_id,
                side,
                hint_index,
            };
            GameOutcome::Hint(
                command_handlers::handle_get_dual_hint(&command, clock, sessions, roster, hints)
                    .await?,
            )
        }
        GameAction::Verify {
            group_id,
            guess_player_id,
        } => {
            let command = VerifyGuess {
                correlation_id,
                group_id,
                moderator_id,
                guess_player_id,
            };
            GameOutcome::Guess(
                command_handlers::handle_verify_guess(&command, sessions, roster).await?,
            )
        }
        GameAction::VerifyDualGuess {
            group_id,
            side,
            guess_player_id,
        } => {
            let command = VerifyDualGuess {
                correlation_id,
                group_id,
                moderator_id,
                side,
                guess_player_id,
            };
            GameOutcome::Guess(
                command_handlers::handle_verify_dual_guess(&command, sessions, roster).await?,
            )
        }
        GameAction::Reveal { group_id } => {
            let command = RevealPlayer {
                correlation_id,
                group_id,
                moderator_id,
            };
            GameOutcome::PlayerRevealed(
                command_handlers::handle_reveal_player(&command, clock, sessions, roster).await?,
            )
        }
        GameAction::RevealDual { group_id } => {
            let command = RevealDualRound {
                correlation_id,
                group_id,
                moderator_id,
            };
            GameOutcome::RoundRevealed(
                command_handlers::handle_reveal_dual_round(&command, clock, sessions, roster)
                    .await?,
            )
        }
        GameAction::End { group_id } => {
            let command = EndGame {
                correlation_id,
                group_id,
                moderator_id,
            };
            GameOutcome::Ended(
                command_handlers::handle_end_game(&command, clock, sessions, roster).await?,
            )
        }
        GameAction::Status { group_id } => {
            GameOutcome::Status(query_handlers::get_game_status(group_id, sessions, roster).await?)
        }
    };

    Ok(outcome)
}
