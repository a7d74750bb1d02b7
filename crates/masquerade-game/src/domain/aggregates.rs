//! Aggregate root for a group's guess-who session.

use chrono::{DateTime, Utc};
use masquerade_core::clock::Clock;
use masquerade_core::error::DomainError;
use masquerade_core::rng::{DeterministicRng, shuffle};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fewest eligible players a session can start with.
pub const MIN_PLAYERS: usize = 2;

/// Highest hint index; hints are numbered `1..=MAX_HINT_INDEX`.
pub const MAX_HINT_INDEX: u8 = 3;

/// Which of the two dual-mode tracks an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The left track.
    Left,
    /// The right track.
    Right,
}

impl Side {
    /// Returns the wire name of the side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Whether a session runs one guessing track or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One mystery at a time.
    Single,
    /// Two simultaneous mysteries over one shared pool.
    Dual,
}

impl GameMode {
    /// Returns the wire name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Dual => "dual",
        }
    }
}

/// One current-player pointer and its hint watermark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// The player being guessed on this track, if a turn is open.
    pub current_player_id: Option<Uuid>,
    /// Highest hint index disclosed for the current player; 0 when none.
    pub hint_index: u8,
}

impl Track {
    fn holding(player_id: Option<Uuid>) -> Self {
        Self {
            current_player_id: player_id,
            hint_index: 0,
        }
    }

    fn clear(&mut self) -> Option<Uuid> {
        self.hint_index = 0;
        self.current_player_id.take()
    }
}

/// The guessing tracks of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Tracks {
    /// A single track.
    Single {
        /// The only track.
        current: Track,
    },
    /// Two tracks sharing the revealed set.
    Dual {
        /// The left track.
        left: Track,
        /// The right track.
        right: Track,
    },
}

impl Tracks {
    fn mode(&self) -> GameMode {
        match self {
            Self::Single { .. } => GameMode::Single,
            Self::Dual { .. } => GameMode::Dual,
        }
    }

    fn active_players(&self) -> impl Iterator<Item = Uuid> {
        let pointers = match self {
            Self::Single { current } => [current.current_player_id, None],
            Self::Dual { left, right } => [left.current_player_id, right.current_player_id],
        };
        pointers.into_iter().flatten()
    }

    fn all(&self) -> impl Iterator<Item = &Track> {
        let tracks = match self {
            Self::Single { current } => [Some(current), None],
            Self::Dual { left, right } => [Some(left), Some(right)],
        };
        tracks.into_iter().flatten()
    }

    fn clear(&mut self) {
        match self {
            Self::Single { current } => {
                current.clear();
            }
            Self::Dual { left, right } => {
                left.clear();
                right.clear();
            }
        }
    }
}

/// Outcome of a hint disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintDisclosure {
    /// The player whose hint is disclosed.
    pub player_id: Uuid,
    /// The disclosed hint index.
    pub hint_index: u8,
    /// Whether the watermark moved (and the session must be written).
    pub advanced: bool,
}

/// Players drawn for a dual round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundAssignment {
    /// The player on the left track.
    pub left: Option<Uuid>,
    /// The player on the right track; `None` when the pool ran out.
    pub right: Option<Uuid>,
}

/// Outcome of revealing the current player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedTurn {
    /// The revealed player.
    pub player_id: Uuid,
    /// Whether that reveal completed the game.
    pub game_ended: bool,
}

/// Outcome of revealing a dual round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedRound {
    /// The player revealed on the left track, if it was active.
    pub left: Option<Uuid>,
    /// The player revealed on the right track, if it was active.
    pub right: Option<Uuid>,
    /// Whether the round completed the game.
    pub game_ended: bool,
}

/// The aggregate root for one group's game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    /// The group this session belongs to.
    pub group_id: Uuid,
    /// Version of the stored row this copy was read from (0 if never stored).
    #[serde(skip)]
    pub(crate) version: i64,
    player_order: Vec<Uuid>,
    revealed_players: Vec<Uuid>,
    tracks: Tracks,
    in_progress: bool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Starts a fresh session over `eligible`, shuffled with `rng`.
    ///
    /// Duplicate ids are dropped, keeping the first occurrence. In dual mode
    /// the first two players of the shuffled order open the first round.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientPlayers` if fewer than
    /// [`MIN_PLAYERS`] distinct players are eligible.
    pub fn start(
        group_id: Uuid,
        eligible: &[Uuid],
        mode: GameMode,
        rng: &mut dyn DeterministicRng,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let mut player_order: Vec<Uuid> = Vec::with_capacity(eligible.len());
        for player_id in eligible {
            if !player_order.contains(player_id) {
                player_order.push(*player_id);
            }
        }
        if player_order.len() < MIN_PLAYERS {
            return Err(DomainError::InsufficientPlayers {
                found: player_order.len(),
            });
        }

        shuffle(&mut player_order, rng);

        let tracks = match mode {
            GameMode::Single => Tracks::Single {
                current: Track::default(),
            },
            GameMode::Dual => Tracks::Dual {
                left: Track::holding(Some(player_order[0])),
                right: Track::holding(Some(player_order[1])),
            },
        };

        Ok(Self {
            group_id,
            version: 0,
            player_order,
            revealed_players: Vec::new(),
            tracks,
            in_progress: true,
            started_at: Some(clock.now()),
            ended_at: None,
        })
    }

    /// Returns the version of the row this session was read from.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Returns the fixed turn order.
    #[must_use]
    pub fn player_order(&self) -> &[Uuid] {
        &self.player_order
    }

    /// Returns the revealed players in reveal order.
    #[must_use]
    pub fn revealed_players(&self) -> &[Uuid] {
        &self.revealed_players
    }

    /// Returns the session's tracks.
    #[must_use]
    pub fn tracks(&self) -> &Tracks {
        &self.tracks
    }

    /// Returns whether this is a single or dual session.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.tracks.mode()
    }

    /// Returns whether the game is still running.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Returns when the session started.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the session ended, if it has.
    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Returns the single track's current player; `None` in dual mode.
    #[must_use]
    pub fn current_player_id(&self) -> Option<Uuid> {
        match &self.tracks {
            Tracks::Single { current } => current.current_player_id,
            Tracks::Dual { .. } => None,
        }
    }

    /// Returns the single track's hint watermark; 0 in dual mode.
    #[must_use]
    pub fn current_hint_index(&self) -> u8 {
        match &self.tracks {
            Tracks::Single { current } => current.hint_index,
            Tracks::Dual { .. } => 0,
        }
    }

    /// Returns the number of players not yet revealed.
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.remaining().count()
    }

    fn remaining(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.player_order
            .iter()
            .copied()
            .filter(|player_id| !self.revealed_players.contains(player_id))
    }

    fn unassigned(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.remaining()
            .filter(|player_id| !self.tracks.active_players().any(|active| active == *player_id))
    }

    fn ensure_mode(&self, expected: GameMode) -> Result<(), DomainError> {
        if self.mode() == expected {
            Ok(())
        } else {
            Err(DomainError::WrongMode {
                expected: expected.as_str(),
            })
        }
    }

    fn ensure_can_draw(&self) -> Result<(), DomainError> {
        if self.remaining().next().is_none() {
            return Err(DomainError::AllPlayersRevealed);
        }
        if !self.in_progress {
            return Err(DomainError::NoActiveSession(self.group_id));
        }
        if let Some(active) = self.tracks.active_players().next() {
            return Err(DomainError::TurnAlreadyActive(active));
        }
        Ok(())
    }

    fn track(&self, side: Option<Side>) -> Result<&Track, DomainError> {
        match (&self.tracks, side) {
            (Tracks::Single { current }, None) => Ok(current),
            (Tracks::Dual { left, .. }, Some(Side::Left)) => Ok(left),
            (Tracks::Dual { right, .. }, Some(Side::Right)) => Ok(right),
            (Tracks::Single { .. }, Some(_)) => Err(DomainError::WrongMode {
                expected: GameMode::Dual.as_str(),
            }),
            (Tracks::Dual { .. }, None) => Err(DomainError::WrongMode {
                expected: GameMode::Single.as_str(),
            }),
        }
    }

    fn track_mut(&mut self, side: Option<Side>) -> Result<&mut Track, DomainError> {
        match (&mut self.tracks, side) {
            (Tracks::Single { current }, None) => Ok(current),
            (Tracks::Dual { left, .. }, Some(Side::Left)) => Ok(left),
            (Tracks::Dual { right, .. }, Some(Side::Right)) => Ok(right),
            (Tracks::Single { .. }, Some(_)) => Err(DomainError::WrongMode {
                expected: GameMode::Dual.as_str(),
            }),
            (Tracks::Dual { .. }, None) => Err(DomainError::WrongMode {
                expected: GameMode::Single.as_str(),
            }),
        }
    }

    /// Makes the first unrevealed player in turn order current.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` on a dual session, `AllPlayersRevealed` when no
    /// player remains, `NoActiveSession` after the game ended, and
    /// `TurnAlreadyActive` while a current player is still unrevealed.
    pub fn next_turn(&mut self) -> Result<Uuid, DomainError> {
        self.ensure_mode(GameMode::Single)?;
        self.ensure_can_draw()?;
        let next = self
            .remaining()
            .next()
            .ok_or(DomainError::AllPlayersRevealed)?;
        *self.track_mut(None)? = Track::holding(Some(next));
        Ok(next)
    }

    /// Draws the next two distinct unrevealed players for a dual round.
    ///
    /// When a single player remains only the left track is filled.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_turn`], with `WrongMode` on a single session.
    pub fn next_round(&mut self) -> Result<RoundAssignment, DomainError> {
        self.ensure_mode(GameMode::Dual)?;
        self.ensure_can_draw()?;
        let assignment = {
            let mut remaining = self.remaining();
            RoundAssignment {
                left: remaining.next(),
                right: remaining.next(),
            }
        };
        *self.track_mut(Some(Side::Left))? = Track::holding(assignment.left);
        *self.track_mut(Some(Side::Right))? = Track::holding(assignment.right);
        Ok(assignment)
    }

    /// Discloses a hint on a track and raises its watermark.
    ///
    /// `side` is `None` for single sessions. A missing `requested` index
    /// means "the hint after the watermark". The watermark never moves
    /// backward: re-requesting a lower hint is allowed but leaves it as is.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` if `side` does not match the session,
    /// `NoCurrentPlayer` if the track is idle, and `InvalidHintIndex` for an
    /// index outside `1..=3`.
    pub fn disclose_hint(
        &mut self,
        side: Option<Side>,
        requested: Option<i64>,
    ) -> Result<HintDisclosure, DomainError> {
        let track = self.track_mut(side)?;
        let player_id = track
            .current_player_id
            .ok_or(DomainError::NoCurrentPlayer)?;
        let requested = requested.unwrap_or_else(|| i64::from(track.hint_index) + 1);
        let hint_index = u8::try_from(requested)
            .ok()
            .filter(|index| (1..=MAX_HINT_INDEX).contains(index))
            .ok_or(DomainError::InvalidHintIndex(requested))?;

        let advanced = hint_index > track.hint_index;
        track.hint_index = track.hint_index.max(hint_index);

        Ok(HintDisclosure {
            player_id,
            hint_index,
            advanced,
        })
    }

    /// Checks a guess against a track's current player. Never mutates.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` if `side` does not match the session and
    /// `NoCurrentPlayer` if the track is idle.
    pub fn verify_guess(&self, side: Option<Side>, guess: Uuid) -> Result<bool, DomainError> {
        let current = self
            .track(side)?
            .current_player_id
            .ok_or(DomainError::NoCurrentPlayer)?;
        Ok(current == guess)
    }

    /// Reveals the single track's current player, ending the game when it
    /// was the last one.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` on a dual session and `NoCurrentPlayer` if no
    /// turn is open.
    pub fn reveal_current(&mut self, clock: &dyn Clock) -> Result<RevealedTurn, DomainError> {
        let track = self.track_mut(None)?;
        let player_id = track
            .current_player_id
            .ok_or(DomainError::NoCurrentPlayer)?;
        track.clear();

        self.record_revealed(player_id);
        let game_ended = self.finish_if_complete(clock);

        Ok(RevealedTurn {
            player_id,
            game_ended,
        })
    }

    /// Reveals both tracks of a dual round in one step.
    ///
    /// A track may only be idle if the pool had nobody left to put on it.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` on a single session, `NoCurrentPlayer` if neither
    /// track is active, and `SideInactive` if one track is idle while an
    /// unassigned player could have filled it.
    pub fn reveal_round(&mut self, clock: &dyn Clock) -> Result<RevealedRound, DomainError> {
        self.ensure_mode(GameMode::Dual)?;
        let has_unassigned = self.unassigned().next().is_some();
        let Tracks::Dual { left, right } = &mut self.tracks else {
            return Err(DomainError::WrongMode {
                expected: GameMode::Dual.as_str(),
            });
        };

        match (left.current_player_id, right.current_player_id) {
            (None, None) => return Err(DomainError::NoCurrentPlayer),
            (None, Some(_)) if has_unassigned => {
                return Err(DomainError::SideInactive(Side::Left.as_str()));
            }
            (Some(_), None) if has_unassigned => {
                return Err(DomainError::SideInactive(Side::Right.as_str()));
            }
            _ => {}
        }

        let revealed_left = left.clear();
        let revealed_right = right.clear();
        for player_id in [revealed_left, revealed_right].into_iter().flatten() {
            self.record_revealed(player_id);
        }
        let game_ended = self.finish_if_complete(clock);

        Ok(RevealedRound {
            left: revealed_left,
            right: revealed_right,
            game_ended,
        })
    }

    /// Ends the game, clearing any open turn but keeping the reveal history.
    ///
    /// Returns `false` without touching anything if it had already ended.
    pub fn end(&mut self, clock: &dyn Clock) -> bool {
        if !self.in_progress && self.ended_at.is_some() {
            return false;
        }
        self.in_progress = false;
        self.tracks.clear();
        self.ended_at = Some(clock.now());
        true
    }

    fn record_revealed(&mut self, player_id: Uuid) {
        if !self.revealed_players.contains(&player_id) {
            self.revealed_players.push(player_id);
        }
    }

    fn finish_if_complete(&mut self, clock: &dyn Clock) -> bool {
        let complete = self.revealed_players.len() == self.player_order.len();
        if complete {
            self.end(clock);
        }
        complete
    }

    /// Checks the structural invariants of a session read from storage.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` naming the first broken invariant.
    pub fn validate(&self) -> Result<(), DomainError> {
        let corrupt = |reason: &str| -> Result<(), DomainError> {
            Err(DomainError::Infrastructure(format!(
                "corrupt session for group {}: {reason}",
                self.group_id
            )))
        };

        for (i, player_id) in self.player_order.iter().enumerate() {
            if self.player_order[..i].contains(player_id) {
                return corrupt("duplicate player in order");
            }
        }
        for (i, player_id) in self.revealed_players.iter().enumerate() {
            if !self.player_order.contains(player_id) {
                return corrupt("revealed player outside order");
            }
            if self.revealed_players[..i].contains(player_id) {
                return corrupt("player revealed twice");
            }
        }
        for track in self.tracks.all() {
            if track.hint_index > MAX_HINT_INDEX {
                return corrupt("hint index out of range");
            }
        }
        let active: Vec<Uuid> = self.tracks.active_players().collect();
        for player_id in &active {
            if !self.player_order.contains(player_id) || self.revealed_players.contains(player_id)
            {
                return corrupt("current player is revealed or unknown");
            }
        }
        if active.len() == 2 && active[0] == active[1] {
            return corrupt("same player current on both sides");
        }
        if self.revealed_players.len() == self.player_order.len()
            && (self.in_progress || !active.is_empty())
        {
            return corrupt("all players revealed but game still open");
        }
        if !self.in_progress && (self.ended_at.is_none() || !active.is_empty()) {
            return corrupt("ended game without end time or with an open turn");
        }
        Ok(())
    }
}
