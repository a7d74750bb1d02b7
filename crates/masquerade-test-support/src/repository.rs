//! Test repositories — mock `SessionRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use masquerade_core::error::DomainError;
use masquerade_core::repository::{SessionRepository, StoredSession};
use uuid::Uuid;

/// An in-memory session repository with real compare-and-swap semantics.
/// Records every successful save so tests can assert what was written.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    rows: Mutex<HashMap<Uuid, StoredSession>>,
    saved: Mutex<Vec<(i64, StoredSession)>>,
}

impl InMemorySessionRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that already holds `session`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_session(session: StoredSession) -> Self {
        let repo = Self::new();
        repo.rows.lock().unwrap().insert(session.group_id, session);
        repo
    }

    /// Returns the current row for `group_id`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn row(&self, group_id: Uuid) -> Option<StoredSession> {
        self.rows.lock().unwrap().get(&group_id).cloned()
    }

    /// Returns a snapshot of all successful saves as `(expected_version, row)`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_sessions(&self) -> Vec<(i64, StoredSession)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load_session(&self, group_id: Uuid) -> Result<Option<StoredSession>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&group_id).cloned())
    }

    async fn save_session(
        &self,
        expected_version: i64,
        session: &StoredSession,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let actual = rows.get(&session.group_id).map_or(0, |row| row.version);
        if actual != expected_version {
            return Err(DomainError::Conflict {
                group_id: session.group_id,
                expected: expected_version,
                actual,
            });
        }
        rows.insert(session.group_id, session.clone());
        self.saved
            .lock()
            .unwrap()
            .push((expected_version, session.clone()));
        Ok(())
    }
}

/// A repository that serves `session` on load but always loses the race on
/// save, as if another writer bumped the version in between.
#[derive(Debug)]
pub struct StaleSessionRepository {
    session: Option<StoredSession>,
}

impl StaleSessionRepository {
    /// Create a repository that loads `session` and rejects every save.
    #[must_use]
    pub fn new(session: Option<StoredSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionRepository for StaleSessionRepository {
    async fn load_session(&self, _group_id: Uuid) -> Result<Option<StoredSession>, DomainError> {
        Ok(self.session.clone())
    }

    async fn save_session(
        &self,
        expected_version: i64,
        session: &StoredSession,
    ) -> Result<(), DomainError> {
        Err(DomainError::Conflict {
            group_id: session.group_id,
            expected: expected_version,
            actual: expected_version + 1,
        })
    }
}

/// A session repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingSessionRepository;

#[async_trait]
impl SessionRepository for FailingSessionRepository {
    async fn load_session(&self, _group_id: Uuid) -> Result<Option<StoredSession>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save_session(
        &self,
        _expected_version: i64,
        _session: &StoredSession,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
