//! Masquerade — live guess-who session controller.
//!
//! Runs one game per group: a shuffled turn order, staged hint disclosure,
//! guess checks, and reveals, in single-track or dual-track mode.

pub mod application;
pub mod domain;
