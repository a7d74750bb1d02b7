//! Domain layer: the `GameSession` aggregate and its commands.

pub mod aggregates;
pub mod commands;
