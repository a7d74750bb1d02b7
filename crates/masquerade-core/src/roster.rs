//! Read-only access to group membership, eligibility and player identity.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Display name used when a player's identity cannot be resolved.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Mystery Player";

/// Public identity of a player, shown on reveal and in the status view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// The player identifier.
    pub player_id: Uuid,
    /// Name shown to the group.
    pub display_name: String,
    /// Reference to the player's avatar image, if any.
    pub avatar_ref: Option<String>,
    /// Profile answers worth showing on reveal, keyed by question.
    pub profile_highlights: BTreeMap<String, String>,
}

impl PlayerIdentity {
    /// Placeholder identity for a player the roster does not know.
    #[must_use]
    pub fn anonymous(player_id: Uuid) -> Self {
        Self {
            player_id,
            display_name: ANONYMOUS_DISPLAY_NAME.to_owned(),
            avatar_ref: None,
            profile_highlights: BTreeMap::new(),
        }
    }
}

/// Source of groups, eligible players, and identities.
#[async_trait]
pub trait PlayerRoster: Send + Sync {
    /// Returns the moderator of the group, or `None` if the group does not exist.
    async fn group_moderator(&self, group_id: Uuid) -> Result<Option<Uuid>, DomainError>;

    /// Lists the players with a complete profile and generated hints.
    async fn list_eligible_players(&self, group_id: Uuid) -> Result<Vec<Uuid>, DomainError>;

    /// Looks up a player's public identity within a group.
    async fn get_player_identity(
        &self,
        group_id: Uuid,
        player_id: Uuid,
    ) -> Result<Option<PlayerIdentity>, DomainError>;
}
