//! Query handlers for the game session controller.
//!
//! The status projection is a pure read: it loads the group's session row,
//! joins the revealed players' public identities, and never writes.

use chrono::{DateTime, Utc};
use masquerade_core::error::DomainError;
use masquerade_core::repository::SessionRepository;
use masquerade_core::roster::{PlayerIdentity, PlayerRoster};
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::{GameMode, Track, Tracks};

/// Both dual-mode tracks.
#[derive(Debug, Clone, Serialize)]
pub struct DualTracksView {
    /// The left track.
    pub left: Track,
    /// The right track.
    pub right: Track,
}

/// Read-only view of a group's game, for polling clients.
#[derive(Debug, Clone, Serialize)]
pub struct GameStatusView {
    /// The group.
    pub group_id: Uuid,
    /// Whether the game is running.
    pub in_progress: bool,
    /// Single or dual; `None` when no session exists.
    pub mode: Option<GameMode>,
    /// The current player of a single-track game.
    pub current_player_id: Option<Uuid>,
    /// Hints disclosed for the current player of a single-track game.
    pub current_hint_index: u8,
    /// Both tracks of a dual game.
    pub dual: Option<DualTracksView>,
    /// Players revealed so far.
    pub revealed_count: usize,
    /// Players in the turn order.
    pub total_players: usize,
    /// Revealed players in reveal order.
    pub revealed_players: Vec<PlayerIdentity>,
    /// When the game started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the game ended.
    pub ended_at: Option<DateTime<Utc>>,
    /// Version of the stored row (0 when none).
    pub version: i64,
}

impl GameStatusView {
    fn idle(group_id: Uuid) -> Self {
        Self {
            group_id,
            in_progress: false,
            mode: None,
            current_player_id: None,
            current_hint_index: 0,
            dual: None,
            revealed_count: 0,
            total_players: 0,
            revealed_players: Vec::new(),
            started_at: None,
            ended_at: None,
            version: 0,
        }
    }
}

/// Retrieves the status projection of a group's game.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the group does not exist.
/// Returns `DomainError::Infrastructure` if the stored session is corrupt.
pub async fn get_game_status(
    group_id: Uuid,
    repo: &dyn SessionRepository,
    roster: &dyn PlayerRoster,
) -> Result<GameStatusView, DomainError> {
    if roster.group_moderator(group_id).await?.is_none() {
        return Err(DomainError::NotFound(group_id));
    }
    let Some(session) = command_handlers::load_session(group_id, repo).await? else {
        return Ok(GameStatusView::idle(group_id));
    };

    let mut revealed_players = Vec::with_capacity(session.revealed_players().len());
    for player_id in session.revealed_players() {
        revealed_players.push(command_handlers::resolve_identity(group_id, *player_id, roster).await?);
    }

    let dual = match session.tracks() {
        Tracks::Single { .. } => None,
        Tracks::Dual { left, right } => Some(DualTracksView {
            left: *left,
            right: *right,
        }),
    };

    Ok(GameStatusView {
        group_id,
        in_progress: session.in_progress(),
        mode: Some(session.mode()),
        current_player_id: session.current_player_id(),
        current_hint_index: session.current_hint_index(),
        dual,
        revealed_count: session.revealed_players().len(),
        total_players: session.player_order().len(),
        revealed_players,
        started_at: session.started_at(),
        ended_at: session.ended_at(),
        version: session.version(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};
    use masquerade_core::error::DomainError;
    use masquerade_core::repository::StoredSession;
    use masquerade_core::roster::ANONYMOUS_DISPLAY_NAME;
    use masquerade_test_support::{
        FixedClock, InMemorySessionRepository, MockRng, StaticHintStore, StaticRoster,
    };
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_get_dual_hint, handle_next_turn, handle_reveal_player, handle_start_dual_mode,
        handle_start_game,
    };
    use crate::application::query_handlers::get_game_status;
    use crate::domain::aggregates::{GameMode, Side};
    use crate::domain::commands::{GetDualHint, NextTurn, RevealPlayer, StartDualMode, StartGame};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_get_game_status_without_session_reports_idle() {
        // Arrange
        let group_id = Uuid::new_v4();
        let roster = StaticRoster::new().with_group(group_id, Uuid::new_v4(), &[]);
        let repo = InMemorySessionRepository::new();

        // Act
        let view = get_game_status(group_id, &repo, &roster).await.unwrap();

        // Assert
        assert!(!view.in_progress);
        assert_eq!(view.total_players, 0);
        assert_eq!(view.revealed_count, 0);
        assert!(view.mode.is_none());
        assert!(view.revealed_players.is_empty());
    }

    #[tokio::test]
    async fn test_get_game_status_for_unknown_group_returns_not_found() {
        let group_id = Uuid::new_v4();

        let result =
            get_game_status(group_id, &InMemorySessionRepository::new(), &StaticRoster::new())
                .await;

        assert!(matches!(result, Err(DomainError::NotFound(id)) if id == group_id));
    }

    #[tokio::test]
    async fn test_get_game_status_lists_revealed_identities_in_order() {
        // Arrange
        let group_id = Uuid::new_v4();
        let moderator_id = Uuid::new_v4();
        let players: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let roster = StaticRoster::new()
            .with_group(group_id, moderator_id, &players)
            .without_identity(players[1]);
        let repo = InMemorySessionRepository::new();
        let clock = fixed_clock();
        let rng = Mutex::new(MockRng);

        let start = StartGame {
            correlation_id: Uuid::new_v4(),
            group_id,
            moderator_id,
        };
        handle_start_game(&start, &clock, &rng, &repo, &roster)
            .await
            .unwrap();
        for _ in 0..2 {
            let next = NextTurn {
                correlation_id: Uuid::new_v4(),
                group_id,
                moderator_id,
            };
            handle_next_turn(&next, &clock, &repo, &roster).await.unwrap();
            let reveal = RevealPlayer {
                correlation_id: Uuid::new_v4(),
                group_id,
                moderator_id,
            };
            handle_reveal_player(&reveal, &clock, &repo, &roster)
                .await
                .unwrap();
        }
        let next = NextTurn {
            correlation_id: Uuid::new_v4(),
            group_id,
            moderator_id,
        };
        handle_next_turn(&next, &clock, &repo, &roster).await.unwrap();
        let before = repo.saved_sessions().len();

        // Act
        let view = get_game_status(group_id, &repo, &roster).await.unwrap();

        // Assert
        assert!(view.in_progress);
        assert_eq!(view.mode, Some(GameMode::Single));
        assert_eq!(view.current_player_id, Some(players[2]));
        assert_eq!(view.current_hint_index, 0);
        assert_eq!(view.revealed_count, 2);
        assert_eq!(view.total_players, 3);
        assert_eq!(view.revealed_players[0].display_name, "Player 1");
        assert_eq!(view.revealed_players[1].player_id, players[1]);
        assert_eq!(view.revealed_players[1].display_name, ANONYMOUS_DISPLAY_NAME);
        assert_eq!(view.started_at, Some(clock.0));
        assert!(view.dual.is_none());
        assert_eq!(repo.saved_sessions().len(), before);
    }

    #[tokio::test]
    async fn test_get_game_status_reports_both_dual_tracks() {
        // Arrange
        let group_id = Uuid::new_v4();
        let moderator_id = Uuid::new_v4();
        let players: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let roster = StaticRoster::new().with_group(group_id, moderator_id, &players);
        let hints = StaticHintStore::new().with_generated(group_id, &players);
        let repo = InMemorySessionRepository::new();
        let clock = fixed_clock();
        let rng = Mutex::new(MockRng);

        let start = StartDualMode {
            correlation_id: Uuid::new_v4(),
            group_id,
            moderator_id,
        };
        handle_start_dual_mode(&start, &clock, &rng, &repo, &roster)
            .await
            .unwrap();
        let hint = GetDualHint {
            correlation_id: Uuid::new_v4(),
            group_id,
            moderator_id,
            side: Side::Right,
            hint_index: Some(2),
        };
        handle_get_dual_hint(&hint, &clock, &repo, &roster, &hints)
            .await
            .unwrap();

        // Act
        let view = get_game_status(group_id, &repo, &roster).await.unwrap();

        // Assert
        assert_eq!(view.mode, Some(GameMode::Dual));
        assert_eq!(view.current_player_id, None);
        let dual = view.dual.unwrap();
        assert_eq!(dual.left.current_player_id, Some(players[0]));
        assert_eq!(dual.left.hint_index, 0);
        assert_eq!(dual.right.current_player_id, Some(players[1]));
        assert_eq!(dual.right.hint_index, 2);
        assert_eq!(view.version, 2);
    }

    #[tokio::test]
    async fn test_get_game_status_with_corrupt_row_returns_infrastructure_error() {
        // Arrange
        let group_id = Uuid::new_v4();
        let roster = StaticRoster::new().with_group(group_id, Uuid::new_v4(), &[]);
        let repo = InMemorySessionRepository::with_session(StoredSession {
            group_id,
            version: 3,
            state: serde_json::json!({ "group_id": group_id, "player_order": "oops" }),
            updated_at: fixed_clock().0,
        });

        // Act
        let result = get_game_status(group_id, &repo, &roster).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
