//! Masquerade Core — shared domain abstractions.
//!
//! This crate defines the traits and types the game controller depends on:
//! time, randomness, the versioned session store, and the read-only
//! collaborators that supply eligible players, identities, and hint text.
//! It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod hints;
pub mod repository;
pub mod rng;
pub mod roster;
