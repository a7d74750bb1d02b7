//! Shared application state.

use std::sync::{Arc, Mutex};

use masquerade_core::clock::{Clock, SystemClock};
use masquerade_core::hints::HintStore;
use masquerade_core::repository::SessionRepository;
use masquerade_core::rng::{DeterministicRng, SystemRng};
use masquerade_core::roster::PlayerRoster;
use masquerade_game::application::dispatch::GameServices;
use masquerade_store::pg_hint_store::PgHintStore;
use masquerade_store::pg_roster::PgPlayerRoster;
use masquerade_store::pg_session_repository::PgSessionRepository;
use sqlx::PgPool;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Shuffle source, locked only for the synchronous shuffle.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Versioned session rows.
    pub session_repository: Arc<dyn SessionRepository>,
    /// Groups, eligibility, and identities.
    pub roster: Arc<dyn PlayerRoster>,
    /// Player hints.
    pub hint_store: Arc<dyn HintStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        session_repository: Arc<dyn SessionRepository>,
        roster: Arc<dyn PlayerRoster>,
        hint_store: Arc<dyn HintStore>,
    ) -> Self {
        Self {
            clock,
            rng,
            session_repository,
            roster,
            hint_store,
        }
    }

    /// Production state over `PostgreSQL`. A `shuffle_seed` makes every
    /// shuffle of the process reproducible.
    #[must_use]
    pub fn from_pool(pool: PgPool, shuffle_seed: Option<u64>) -> Self {
        let rng = shuffle_seed.map_or_else(SystemRng::from_os, SystemRng::seeded);
        Self::new(
            Arc::new(SystemClock),
            Arc::new(Mutex::new(rng)),
            Arc::new(PgSessionRepository::new(pool.clone())),
            Arc::new(PgPlayerRoster::new(pool.clone())),
            Arc::new(PgHintStore::new(pool)),
        )
    }

    /// Borrows the collaborators for one dispatched action.
    #[must_use]
    pub fn services(&self) -> GameServices<'_> {
        GameServices {
            clock: self.clock.as_ref(),
            rng: self.rng.as_ref(),
            sessions: self.session_repository.as_ref(),
            roster: self.roster.as_ref(),
            hints: self.hint_store.as_ref(),
        }
    }
}
