//! Boundary to the surrounding world engine
//!
//! The minigame never owns players or NPCs. It reaches them through the
//! [`World`] trait by id or handle. [`sim::SimWorld`] is an in-memory
//! implementation used by the headless server and by tests.

pub mod sim;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::location::Location;

/// Unique player identifier
pub type PlayerId = Uuid;

/// NPC definition id (which kind of NPC)
pub type NpcId = u16;

/// Handle to one spawned NPC instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NpcHandle(pub u64);

impl fmt::Display for NpcHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npc#{}", self.0)
    }
}

/// Regions of the map the minigame cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    /// The island where sessions are played
    Game,
    /// The outpost dock with the boats
    Outpost,
    NoviceBoat,
    IntermediateBoat,
    VeteranBoat,
}

impl Area {
    /// Inclusive tile bounds as (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        match self {
            Area::Game => (2624, 2560, 2690, 2625),
            Area::Outpost => (2630, 2630, 2680, 2680),
            Area::NoviceBoat => (2660, 2638, 2663, 2643),
            Area::IntermediateBoat => (2637, 2642, 2640, 2647),
            Area::VeteranBoat => (2632, 2649, 2635, 2654),
        }
    }

    pub fn contains(&self, location: Location) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bounds();
        location.x >= min_x && location.x <= max_x && location.y >= min_y && location.y <= max_y
    }
}

/// Facial expression shown on a dialogue head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueExpression {
    Calm,
    Happy,
    Distressed,
}

/// Failures reported by the world engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("Player {0} is not in the world")]
    PlayerNotFound(PlayerId),
    #[error("No spawned NPC for {0}")]
    NpcNotFound(NpcHandle),
    #[error("Area {0:?} is unavailable")]
    AreaUnavailable(Area),
}

/// Operations the minigame needs from the world engine
pub trait World {
    /// Spawn an NPC and start tracking it
    fn spawn_npc(&mut self, npc_id: NpcId, location: Location) -> NpcHandle;

    /// Definition id of a spawned NPC, `None` once it is gone
    fn npc_id(&self, handle: NpcHandle) -> Option<NpcId>;

    /// Current hit points, `None` once the NPC is gone or dying
    fn npc_hitpoints(&self, handle: NpcHandle) -> Option<u32>;

    /// Flag an NPC for removal on the next world cycle
    fn mark_for_removal(&mut self, handle: NpcHandle) -> Result<(), WorldError>;

    /// Players currently standing inside `area`
    fn players_in_area(&self, area: Area) -> Result<Vec<PlayerId>, WorldError>;

    /// Teleport a player
    fn move_player(&mut self, player: PlayerId, location: Location) -> Result<(), WorldError>;

    /// Plain chatbox message
    fn send_message(&mut self, player: PlayerId, message: &str) -> Result<(), WorldError>;

    /// Scripted dialogue line spoken by `speaker`
    fn send_dialogue(
        &mut self,
        player: PlayerId,
        speaker: NpcId,
        lines: &[&str],
        expression: DialogueExpression,
    ) -> Result<(), WorldError>;

    fn attribute(&self, player: PlayerId, key: &str) -> Result<Option<i64>, WorldError>;

    fn set_attribute(&mut self, player: PlayerId, key: &str, value: i64) -> Result<(), WorldError>;

    /// Lifetime minigame point total
    fn points(&self, player: PlayerId) -> Result<u32, WorldError>;

    /// Add to the point total, returning the new total
    fn add_points(&mut self, player: PlayerId, amount: u32) -> Result<u32, WorldError>;
}
