//! `PostgreSQL` adapters for Masquerade: the versioned session store and
//! read-only views of the roster and hint tables.

pub mod pg_hint_store;
pub mod pg_roster;
pub mod pg_session_repository;
pub mod schema;
