//! `PostgreSQL` implementation of the `PlayerRoster` trait over the group,
//! profile, and identity tables.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use masquerade_core::error::DomainError;
use masquerade_core::roster::{ANONYMOUS_DISPLAY_NAME, PlayerIdentity, PlayerRoster};

const SELECT_GROUP_OWNER: &str = "SELECT owner_id FROM groups WHERE id = $1";

// Eligible means a complete profile with generated hints.
const SELECT_ELIGIBLE_PLAYERS: &str = r"
SELECT user_id FROM profiles
WHERE group_id = $1 AND is_complete AND hints_generated
ORDER BY created_at, user_id
";

const SELECT_PLAYER_IDENTITY: &str = r"
SELECT u.full_name, u.avatar_url, p.answers
FROM user_profiles u
LEFT JOIN profiles p ON p.user_id = u.id AND p.group_id = $1
WHERE u.id = $2
";

type IdentityRow = (Option<String>, Option<String>, Option<serde_json::Value>);

/// PostgreSQL-backed player roster.
#[derive(Debug, Clone)]
pub struct PgPlayerRoster {
    pool: PgPool,
}

impl PgPlayerRoster {
    /// Creates a new `PgPlayerRoster`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flattens a profile's answers into display highlights. Scalar answers are
/// kept as text; nested values and nulls are skipped.
fn highlights_from_answers(answers: Option<serde_json::Value>) -> BTreeMap<String, String> {
    let Some(serde_json::Value::Object(map)) = answers else {
        return BTreeMap::new();
    };
    map.into_iter()
        .filter_map(|(question, answer)| match answer {
            serde_json::Value::String(text) => Some((question, text)),
            serde_json::Value::Number(n) => Some((question, n.to_string())),
            serde_json::Value::Bool(b) => Some((question, b.to_string())),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl PlayerRoster for PgPlayerRoster {
    async fn group_moderator(&self, group_id: Uuid) -> Result<Option<Uuid>, DomainError> {
        sqlx::query_scalar(SELECT_GROUP_OWNER)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("group lookup failed: {e}")))
    }

    async fn list_eligible_players(&self, group_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        sqlx::query_scalar(SELECT_ELIGIBLE_PLAYERS)
            .bind(group_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("eligibility lookup failed: {e}")))
    }

    async fn get_player_identity(
        &self,
        group_id: Uuid,
        player_id: Uuid,
    ) -> Result<Option<PlayerIdentity>, DomainError> {
        let row: Option<IdentityRow> = sqlx::query_as(SELECT_PLAYER_IDENTITY)
            .bind(group_id)
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("identity lookup failed: {e}")))?;

        Ok(row.map(|(full_name, avatar_url, answers)| PlayerIdentity {
            player_id,
            display_name: full_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_DISPLAY_NAME.to_owned()),
            avatar_ref: avatar_url,
            profile_highlights: highlights_from_answers(answers),
        }))
    }
}
