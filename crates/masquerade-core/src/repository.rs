//! Session repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of one group's game session.
///
/// Exactly one row exists per group. `version` is bumped on every write and
/// is the token for compare-and-swap updates.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    /// The group this session belongs to.
    pub group_id: Uuid,
    /// Monotonically increasing row version; the first write is version 1.
    pub version: i64,
    /// Serialized session state.
    pub state: serde_json::Value,
    /// Timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for reading and conditionally writing session rows.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load the session row for a group, if one exists.
    async fn load_session(&self, group_id: Uuid) -> Result<Option<StoredSession>, DomainError>;

    /// Write `session` only if the stored version still equals
    /// `expected_version` (0 when no row existed at read time).
    ///
    /// Returns `DomainError::Conflict` when another writer got there first.
    async fn save_session(
        &self,
        expected_version: i64,
        session: &StoredSession,
    ) -> Result<(), DomainError>;
}
