//! Shared test mocks and utilities for the Masquerade game controller.

mod clock;
mod collaborators;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use collaborators::{StaticHintStore, StaticRoster};
pub use repository::{FailingSessionRepository, InMemorySessionRepository, StaleSessionRepository};
pub use rng::{MockRng, SequenceRng};
