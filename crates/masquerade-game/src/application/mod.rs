//! Application layer: command and query handlers plus the action dispatcher.

pub mod command_handlers;
pub mod dispatch;
pub mod query_handlers;
