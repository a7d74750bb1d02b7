//! `PostgreSQL` implementation of the `SessionRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use masquerade_core::error::DomainError;
use masquerade_core::repository::{SessionRepository, StoredSession};

use crate::schema::{INSERT_SESSION, SELECT_SESSION, SELECT_SESSION_VERSION, UPDATE_SESSION};

type SessionRow = (Uuid, i64, serde_json::Value, DateTime<Utc>);

/// PostgreSQL-backed session repository.
///
/// A save with `expected_version == 0` inserts the row and loses to any
/// existing one; any other save updates only the row still carrying
/// `expected_version`.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Creates a new `PgSessionRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, group_id: Uuid) -> Result<i64, DomainError> {
        let version: Option<i64> = sqlx::query_scalar(SELECT_SESSION_VERSION)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("session version read failed: {e}")))?;
        Ok(version.unwrap_or(0))
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn load_session(&self, group_id: Uuid) -> Result<Option<StoredSession>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(SELECT_SESSION)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("session load failed: {e}")))?;

        Ok(row.map(|(group_id, version, state, updated_at)| StoredSession {
            group_id,
            version,
            state,
            updated_at,
        }))
    }

    async fn save_session(
        &self,
        expected_version: i64,
        session: &StoredSession,
    ) -> Result<(), DomainError> {
        if session.version <= expected_version {
            return Err(DomainError::Validation(format!(
                "new version {} must be greater than expected version {expected_version}",
                session.version
            )));
        }

        let result = if expected_version == 0 {
            sqlx::query(INSERT_SESSION)
                .bind(session.group_id)
                .bind(session.version)
                .bind(&session.state)
                .bind(session.updated_at)
                .execute(&self.pool)
                .await
        } else {
            sqlx::query(UPDATE_SESSION)
                .bind(session.group_id)
                .bind(expected_version)
                .bind(session.version)
                .bind(&session.state)
                .bind(session.updated_at)
                .execute(&self.pool)
                .await
        }
        .map_err(|e| DomainError::Infrastructure(format!("session save failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Conflict {
                group_id: session.group_id,
                expected: expected_version,
                actual: self.current_version(session.group_id).await?,
            });
        }

        debug!(
            group_id = %session.group_id,
            version = session.version,
            "session saved"
        );
        Ok(())
    }
}
