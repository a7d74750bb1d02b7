//! `PostgreSQL` implementation of the `HintStore` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use masquerade_core::error::DomainError;
use masquerade_core::hints::{HintSet, HintStore};

const SELECT_HINTS: &str =
    "SELECT hint1, hint2, hint3 FROM hints WHERE group_id = $1 AND user_id = $2";

/// PostgreSQL-backed hint store.
#[derive(Debug, Clone)]
pub struct PgHintStore {
    pool: PgPool,
}

impl PgHintStore {
    /// Creates a new `PgHintStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HintStore for PgHintStore {
    async fn get_hints(
        &self,
        group_id: Uuid,
        player_id: Uuid,
    ) -> Result<Option<HintSet>, DomainError> {
        let row: Option<(String, String, String)> = sqlx::query_as(SELECT_HINTS)
            .bind(group_id)
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("hint lookup failed: {e}")))?;

        Ok(row.map(|(first, second, third)| HintSet::new(first, second, third)))
    }
}
