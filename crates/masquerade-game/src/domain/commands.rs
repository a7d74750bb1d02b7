//! Commands for the game session controller.
//!
//! Every mutating command carries the moderator issuing it; the handler
//! rejects callers who do not moderate the target group.

use masquerade_core::command::Command;
use uuid::Uuid;

use super::aggregates::Side;

macro_rules! impl_command {
    ($ty:ty, $name:literal) => {
        impl Command for $ty {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn group_id(&self) -> Uuid {
                self.group_id
            }
        }
    };
}

/// Command to start (or restart) a single-track game.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group whose game starts.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
}

impl_command!(StartGame, "game.start");

/// Command to start (or restart) a dual-track game.
#[derive(Debug, Clone)]
pub struct StartDualMode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group whose game starts.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
}

impl_command!(StartDualMode, "game.start_dual_mode");

/// Command to make the next unrevealed player current.
#[derive(Debug, Clone)]
pub struct NextTurn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
}

impl_command!(NextTurn, "game.next_turn");

/// Command to draw the next pair of players in dual mode.
#[derive(Debug, Clone)]
pub struct NextDualRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
}

impl_command!(NextDualRound, "game.next_dual_round");

/// Command to disclose one of the current player's hints.
#[derive(Debug, Clone)]
pub struct GetHint {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
    /// Hint to disclose (1-3); `None` for the one after the watermark.
    pub hint_index: Option<i64>,
}

impl_command!(GetHint, "game.get_hint");

/// Command to disclose a hint on one dual-mode side.
#[derive(Debug, Clone)]
pub struct GetDualHint {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
    /// The targeted side.
    pub side: Side,
    /// Hint to disclose (1-3); `None` for the one after the watermark.
    pub hint_index: Option<i64>,
}

impl_command!(GetDualHint, "game.get_dual_hint");

/// Command to check a guess against the current player.
#[derive(Debug, Clone)]
pub struct VerifyGuess {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
    /// The guessed player.
    pub guess_player_id: Uuid,
}

impl_command!(VerifyGuess, "game.verify_guess");

/// Command to check a guess against one dual-mode side.
#[derive(Debug, Clone)]
pub struct VerifyDualGuess {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
    /// The targeted side.
    pub side: Side,
    /// The guessed player.
    pub guess_player_id: Uuid,
}

impl_command!(VerifyDualGuess, "game.verify_dual_guess");

/// Command to reveal the current player.
#[derive(Debug, Clone)]
pub struct RevealPlayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
}

impl_command!(RevealPlayer, "game.reveal_player");

/// Command to reveal both dual-mode sides.
#[derive(Debug, Clone)]
pub struct RevealDualRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
}

impl_command!(RevealDualRound, "game.reveal_dual_round");

/// Command to force-terminate the game.
#[derive(Debug, Clone)]
pub struct EndGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The caller.
    pub moderator_id: Uuid,
}

impl_command!(EndGame, "game.end");
