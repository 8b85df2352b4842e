//! Pest Control Server Library
//!
//! The Pest Control minigame: three boat lobbies feeding one island session,
//! driven by a single-threaded tick scheduler.
//!
//! The game world is reached through the [`world::World`] trait.
//! [`world::sim::SimWorld`] is an in-memory implementation used by the demo
//! binary and the tests.

pub mod config;
pub mod game;
pub mod lobby;
pub mod metrics;
pub mod minigame;
pub mod util;
pub mod world;
