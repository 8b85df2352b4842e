//! Minigame constants
//!
//! Values that can be overridden at startup live in [`crate::config`]; these are
//! the defaults and the fixed map data.

/// Scheduler timing
pub mod tick {
    /// Length of one world tick in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 600;
}

/// NPC definition ids
pub mod npc {
    use crate::world::NpcId;

    /// Void Knight who speaks the briefing and outcome dialogue
    pub const VOID_KNIGHT: NpcId = 1756;
    /// Void Knight defended on the island
    pub const VOID_KNIGHT_GAME: NpcId = 1755;
    /// Squire standing by the landing boat
    pub const SQUIRE: NpcId = 1760;
    pub const PORTAL_WEST: NpcId = 3777;
    pub const PORTAL_EAST: NpcId = 3778;
    pub const PORTAL_SOUTH_EAST: NpcId = 3779;
    pub const PORTAL_SOUTH_WEST: NpcId = 3780;

    /// Starting hit points for NPCs spawned by the minigame
    pub fn default_hitpoints(npc_id: NpcId) -> u32 {
        match npc_id {
            VOID_KNIGHT_GAME => 200,
            PORTAL_WEST | PORTAL_EAST | PORTAL_SOUTH_EAST | PORTAL_SOUTH_WEST => 250,
            1724..=1732 => 40,
            _ => 10,
        }
    }
}

/// Fixed map locations
pub mod locations {
    use crate::util::location::Location;

    /// Tile beside the gang plank, where players land after a game
    pub const GANG_PLANK_START: Location = Location::ground(2657, 2639);
    /// Landing spot on the island
    pub const LAUNCHER_BOAT_BOUNDARY: Location = Location::ground(2656, 2609);
    pub const VOID_KNIGHT_SPAWN: Location = Location::ground(2656, 2592);
    pub const SQUIRE_SPAWN: Location = Location::ground(2655, 2607);
}

/// Portals attacking the island
pub mod portals {
    use super::npc;
    use crate::util::location::Location;
    use crate::world::NpcId;

    /// Fixed portal spawn
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Portal {
        pub npc_id: NpcId,
        pub location: Location,
    }

    pub const PORTALS: [Portal; 4] = [
        Portal {
            npc_id: npc::PORTAL_WEST,
            location: Location::ground(2628, 2591),
        },
        Portal {
            npc_id: npc::PORTAL_EAST,
            location: Location::ground(2680, 2588),
        },
        Portal {
            npc_id: npc::PORTAL_SOUTH_EAST,
            location: Location::ground(2669, 2570),
        },
        Portal {
            npc_id: npc::PORTAL_SOUTH_WEST,
            location: Location::ground(2645, 2569),
        },
    ];

    pub fn is_portal(npc_id: NpcId) -> bool {
        PORTALS.iter().any(|p| p.npc_id == npc_id)
    }
}

/// Defilers spawned beside each portal, grouped by boat tier
pub mod monsters {
    use crate::world::NpcId;

    /// Level 33 and 50
    pub const NOVICE_DEFILERS: &[NpcId] = &[1724, 1726];
    /// Level 50, 66 and 80
    pub const INTERMEDIATE_DEFILERS: &[NpcId] = &[1725, 1727, 1728];
    /// Level 80 and 97
    pub const VETERAN_DEFILERS: &[NpcId] = &[1730, 1732];
}

/// Boat lobby defaults
pub mod lobby {
    /// Ticks a full enough boat waits before launching
    pub const DEFAULT_BOAT_WAITING_TICKS: u32 = 60;
    /// Queue size below which the wait counter keeps resetting
    pub const MIN_PLAYERS: usize = 2;
    /// Most players moved into a game by one launch
    pub const MAX_PLAYERS_PER_LAUNCH: usize = 25;
}

/// Session timing
pub mod session {
    /// Session length once armed
    pub const GAME_DURATION_TICKS: i32 = 400;
    /// Timer value of a settled session
    pub const INACTIVE_TIMER: i32 = -1;
}

/// Settlement rewards
pub mod rewards {
    /// Player attribute holding damage dealt this game
    pub const DAMAGE_ATTRIBUTE: &str = "pc_damage";
    /// Damage above which a winner earns the elevated reward
    pub const DAMAGE_THRESHOLD: i64 = 50;
    pub const BASE_POINTS: u32 = 2;
    pub const ELEVATED_POINTS: u32 = 4;
}
