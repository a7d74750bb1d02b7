//! Route modules.

pub mod actions;
pub mod dual;
pub mod game;
pub mod health;
