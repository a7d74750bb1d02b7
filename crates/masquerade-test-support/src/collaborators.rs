//! In-memory stand-ins for the roster and hint collaborators.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use masquerade_core::error::DomainError;
use masquerade_core::hints::{HintSet, HintStore};
use masquerade_core::roster::{PlayerIdentity, PlayerRoster};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StaticGroup {
    moderator_id: Uuid,
    eligible: Vec<Uuid>,
}

/// A roster backed by fixed groups and identities.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    groups: HashMap<Uuid, StaticGroup>,
    identities: HashMap<Uuid, PlayerIdentity>,
}

impl StaticRoster {
    /// Create an empty roster; every group lookup reports "not found".
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group moderated by `moderator_id` whose eligible players are
    /// `eligible`, in that order. Each player gets the display name
    /// `"Player <n>"` (1-based) unless overridden with [`Self::with_identity`].
    #[must_use]
    pub fn with_group(mut self, group_id: Uuid, moderator_id: Uuid, eligible: &[Uuid]) -> Self {
        for (n, player_id) in eligible.iter().enumerate() {
            self.identities
                .entry(*player_id)
                .or_insert_with(|| PlayerIdentity {
                    player_id: *player_id,
                    display_name: format!("Player {}", n + 1),
                    avatar_ref: None,
                    profile_highlights: BTreeMap::new(),
                });
        }
        self.groups.insert(
            group_id,
            StaticGroup {
                moderator_id,
                eligible: eligible.to_vec(),
            },
        );
        self
    }

    /// Registers or replaces an identity.
    #[must_use]
    pub fn with_identity(mut self, identity: PlayerIdentity) -> Self {
        self.identities.insert(identity.player_id, identity);
        self
    }

    /// Forgets a player's identity so lookups return `None`.
    #[must_use]
    pub fn without_identity(mut self, player_id: Uuid) -> Self {
        self.identities.remove(&player_id);
        self
    }
}

#[async_trait]
impl PlayerRoster for StaticRoster {
    async fn group_moderator(&self, group_id: Uuid) -> Result<Option<Uuid>, DomainError> {
        Ok(self.groups.get(&group_id).map(|group| group.moderator_id))
    }

    async fn list_eligible_players(&self, group_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        Ok(self
            .groups
            .get(&group_id)
            .map(|group| group.eligible.clone())
            .unwrap_or_default())
    }

    async fn get_player_identity(
        &self,
        _group_id: Uuid,
        player_id: Uuid,
    ) -> Result<Option<PlayerIdentity>, DomainError> {
        Ok(self.identities.get(&player_id).cloned())
    }
}

/// A hint store backed by a fixed map.
#[derive(Debug, Clone, Default)]
pub struct StaticHintStore {
    hints: HashMap<(Uuid, Uuid), HintSet>,
}

impl StaticHintStore {
    /// Create an empty hint store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives every player in `players` the hints
    /// `"<n>-1"`, `"<n>-2"`, `"<n>-3"` where `n` is the player's id.
    #[must_use]
    pub fn with_generated(mut self, group_id: Uuid, players: &[Uuid]) -> Self {
        for player_id in players {
            self.hints.insert(
                (group_id, *player_id),
                HintSet::new(
                    format!("{player_id}-1"),
                    format!("{player_id}-2"),
                    format!("{player_id}-3"),
                ),
            );
        }
        self
    }

    /// Registers an explicit hint set.
    #[must_use]
    pub fn with_hints(mut self, group_id: Uuid, player_id: Uuid, hints: HintSet) -> Self {
        self.hints.insert((group_id, player_id), hints);
        self
    }
}

#[async_trait]
impl HintStore for StaticHintStore {
    async fn get_hints(
        &self,
        group_id: Uuid,
        player_id: Uuid,
    ) -> Result<Option<HintSet>, DomainError> {
        Ok(self.hints.get(&(group_id, player_id)).cloned())
    }
}
