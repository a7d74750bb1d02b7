//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Every variant is returned synchronously to the caller and none is retried
/// internally. Only [`DomainError::Conflict`] invites an automatic client
/// retry (re-read, recompute, resubmit).
#[derive(Debug, Error)]
pub enum DomainError {
    /// The group does not exist.
    #[error("group not found: {0}")]
    NotFound(Uuid),

    /// The caller is not the group's moderator.
    #[error("caller {caller} is not the moderator of group {group_id}")]
    Forbidden {
        /// The group being controlled.
        group_id: Uuid,
        /// The identity that issued the action.
        caller: Uuid,
    },

    /// Fewer than two eligible players were available at start.
    #[error("at least 2 eligible players are required, found {found}")]
    InsufficientPlayers {
        /// Number of eligible players reported by the roster.
        found: usize,
    },

    /// No session is in progress for the group.
    #[error("no game in progress for group {0}")]
    NoActiveSession(Uuid),

    /// Every player in the order has already been revealed.
    #[error("all players have already been revealed")]
    AllPlayersRevealed,

    /// The action needs a current player and there is none.
    #[error("no current player")]
    NoCurrentPlayer,

    /// A hint index outside `1..=3` was requested.
    #[error("invalid hint index {0}: must be 1, 2 or 3")]
    InvalidHintIndex(i64),

    /// The hint store has no hints for the player.
    #[error("hints not found for player {0}")]
    HintsNotFound(Uuid),

    /// A turn is still open; reveal it before drawing the next player.
    #[error("player {0} is still the current player")]
    TurnAlreadyActive(Uuid),

    /// A dual-mode side has no current player while it could have had one.
    #[error("{0} side has no current player")]
    SideInactive(&'static str),

    /// A single-track action was sent to a dual session or vice versa.
    #[error("action requires a {expected} session")]
    WrongMode {
        /// The mode the action requires.
        expected: &'static str,
    },

    /// Optimistic concurrency conflict on the session row.
    #[error(
        "concurrency conflict on group {group_id}: expected version {expected}, found {actual}"
    )]
    Conflict {
        /// The group whose session had the conflict.
        group_id: Uuid,
        /// The version the writer read.
        expected: i64,
        /// The version found at write time.
        actual: i64,
    },

    /// A malformed request.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
