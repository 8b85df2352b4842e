//! Game session state machine
//!
//! A session is inactive until a boat wave arms it. While active, each tick
//! counts the timer down and checks whether the game has been lost or won.

use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::game::constants::{locations, npc, portals, session};
use crate::game::task::TickFault;
use crate::util::location::Location;
use crate::world::{Area, NpcHandle, NpcId, World};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Victory,
    Defeat,
}

impl SessionOutcome {
    pub fn won(&self) -> bool {
        matches!(self, SessionOutcome::Victory)
    }
}

impl From<bool> for SessionOutcome {
    fn from(won: bool) -> Self {
        if won {
            SessionOutcome::Victory
        } else {
            SessionOutcome::Defeat
        }
    }
}

/// The single running game on the island
#[derive(Debug)]
pub struct GameSession {
    timer: i32,
    started: bool,
    spawned: Vec<NpcHandle>,
    portals: Vec<NpcHandle>,
    /// Decided but not yet settled
    pending: Option<SessionOutcome>,
    duration_ticks: i32,
}

impl GameSession {
    pub fn new(duration_ticks: i32) -> Self {
        Self {
            timer: session::INACTIVE_TIMER,
            started: false,
            spawned: Vec::new(),
            portals: Vec::new(),
            pending: None,
            duration_ticks,
        }
    }

    /// Whether a game is currently running
    pub fn is_active(&self) -> bool {
        self.started && self.timer > 0
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Outcome waiting on a settlement that has not gone through yet
    pub fn pending_outcome(&self) -> Option<SessionOutcome> {
        self.pending
    }

    /// Ticks left, zero or negative when inactive
    pub fn timer(&self) -> i32 {
        self.timer
    }

    pub fn spawned(&self) -> &[NpcHandle] {
        &self.spawned
    }

    /// Spawn an NPC that belongs to this session
    pub fn spawn_npc<W: World>(
        &mut self,
        world: &mut W,
        npc_id: NpcId,
        location: Location,
    ) -> NpcHandle {
        let handle = world.spawn_npc(npc_id, location);
        self.spawned.push(handle);
        if portals::is_portal(npc_id) {
            self.portals.push(handle);
        }
        handle
    }

    /// Spawn the knight, the squire and the portals
    pub fn spawn_island<W: World>(&mut self, world: &mut W) {
        self.spawn_npc(world, npc::VOID_KNIGHT_GAME, locations::VOID_KNIGHT_SPAWN);
        self.spawn_npc(world, npc::SQUIRE, locations::SQUIRE_SPAWN);
        for portal in portals::PORTALS {
            self.spawn_npc(world, portal.npc_id, portal.location);
        }
    }

    /// Spawn one defiler beside each portal, one step toward the knight
    pub fn spawn_defilers<W: World>(&mut self, world: &mut W, defilers: &[NpcId]) {
        let mut rng = rand::thread_rng();
        for portal in portals::PORTALS {
            let Some(&npc_id) = defilers.choose(&mut rng) else {
                return;
            };
            let toward_knight = locations::VOID_KNIGHT_SPAWN.direction_from(portal.location);
            self.spawn_npc(world, npc_id, portal.location.step(toward_knight));
        }
    }

    /// Start a game if none is running.
    ///
    /// Respawns the island when the previous game cleared it. Returns false
    /// when a game was already running or is still waiting to be settled.
    pub fn arm<W: World>(&mut self, world: &mut W, defilers: &[NpcId]) -> bool {
        if self.is_active() || self.pending.is_some() {
            return false;
        }
        if self.spawned.is_empty() {
            self.spawn_island(world);
        }
        self.spawn_defilers(world, defilers);
        self.timer = self.duration_ticks;
        self.started = true;
        info!(
            ticks = self.timer,
            npcs = self.spawned.len(),
            "Session armed"
        );
        true
    }

    /// Hit points of the defended knight. Zero when absent or already removed.
    pub fn knight_health<W: World>(&self, world: &W) -> u32 {
        self.spawned
            .iter()
            .find(|h| world.npc_id(**h) == Some(npc::VOID_KNIGHT_GAME))
            .and_then(|h| world.npc_hitpoints(*h))
            .unwrap_or(0)
    }

    /// Portals spawned by this session that still stand. A removed portal
    /// counts as destroyed.
    pub fn portals_remaining<W: World>(&self, world: &W) -> usize {
        self.portals
            .iter()
            .filter(|h| world.npc_hitpoints(**h).unwrap_or(0) > 0)
            .count()
    }

    /// Advance one tick.
    ///
    /// Returns the outcome once the game should be settled, and keeps
    /// returning it every tick until [`clean_up`](Self::clean_up) runs. On
    /// error nothing has changed and the next tick tries again.
    pub fn advance<W: World>(&mut self, world: &W) -> Result<Option<SessionOutcome>, TickFault> {
        if let Some(outcome) = self.pending {
            debug!(outcome = ?outcome, "Retrying settlement");
            return Ok(Some(outcome));
        }
        if !self.is_active() {
            return Ok(None);
        }

        let players = world.players_in_area(Area::Game)?.len();
        self.timer -= 1;

        let outcome = if players == 0 || self.knight_health(world) == 0 {
            debug!(players, timer = self.timer, "Session lost");
            Some(SessionOutcome::Defeat)
        } else if !self.portals.is_empty() && self.portals_remaining(world) == 0 {
            debug!(timer = self.timer, "All portals destroyed");
            Some(SessionOutcome::Victory)
        } else if self.timer <= 0 {
            Some(SessionOutcome::Victory)
        } else {
            None
        };

        self.pending = outcome;
        Ok(outcome)
    }

    /// Reset to inactive and remove every spawned NPC. Safe to repeat.
    pub fn clean_up<W: World>(&mut self, world: &mut W) {
        self.timer = session::INACTIVE_TIMER;
        self.started = false;
        self.pending = None;
        self.portals.clear();
        for handle in self.spawned.drain(..) {
            if let Err(e) = world.mark_for_removal(handle) {
                debug!("Skipping removal of {}: {}", handle, e);
            }
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(session::GAME_DURATION_TICKS)
    }
}
