//! Session store database schema.

/// SQL to create the game sessions table.
pub const CREATE_GAME_SESSIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS game_sessions (
    group_id   UUID PRIMARY KEY,
    version    BIGINT NOT NULL CHECK (version > 0),
    state      JSONB NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);
";

pub(crate) const SELECT_SESSION: &str =
    "SELECT group_id, version, state, updated_at FROM game_sessions WHERE group_id = $1";

pub(crate) const SELECT_SESSION_VERSION: &str =
    "SELECT version FROM game_sessions WHERE group_id = $1";

pub(crate) const INSERT_SESSION: &str = r"
INSERT INTO game_sessions (group_id, version, state, updated_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (group_id) DO NOTHING
";

pub(crate) const UPDATE_SESSION: &str = r"
UPDATE game_sessions
SET version = $3, state = $4, updated_at = $5
WHERE group_id = $1 AND version = $2
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_and_schema_constant_agree() {
        let migration = include_str!("../../../migrations/20260101000100_create_game_sessions.sql");

        let normalize = |sql: &str| sql.split_whitespace().collect::<Vec<_>>().join(" ");

        assert!(normalize(migration).contains(&normalize(CREATE_GAME_SESSIONS_TABLE)));
    }
}
