//! Boat lobby
//!
//! Players board a boat and wait in its queue until the boat's lobby task
//! launches them onto the island.

pub mod boat;
pub mod task;
