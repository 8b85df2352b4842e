//! Pest Control
//!
//! Owns the boat queues and the island session. All state is reached through
//! this value; nothing is global.

use tracing::{info, warn};

use crate::config::MinigameConfig;
use crate::game::session::{GameSession, SessionOutcome};
use crate::game::settlement::{self, SettlementReport};
use crate::game::task::{TaskManager, TickFault};
use crate::lobby::boat::{BoatQueue, BoatTier};
use crate::lobby::task::{BoatLobbyTask, LobbyTick};
use crate::minigame::{GameObject, Minigame, MinigameContext, ProcessTask};
use crate::world::{PlayerId, World, WorldError};

/// Running totals since startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub sessions_armed: u64,
    pub victories: u64,
    pub defeats: u64,
    pub players_launched: u64,
    pub points_awarded: u64,
}

pub struct PestControl {
    config: MinigameConfig,
    boats: [BoatQueue; 3],
    session: GameSession,
    stats: SessionStats,
}

impl PestControl {
    pub fn new(config: MinigameConfig) -> Self {
        let session = GameSession::new(config.game_duration_ticks);
        Self {
            boats: BoatTier::ALL.map(BoatQueue::new),
            session,
            stats: SessionStats::default(),
            config,
        }
    }

    /// Build the minigame, spawn the island and register its tick tasks
    pub fn start<W: World>(
        config: MinigameConfig,
        mut world: W,
    ) -> (MinigameContext<Self, W>, TaskManager<MinigameContext<Self, W>>) {
        let mut pest_control = Self::new(config);
        pest_control.init(&mut world);

        let mut tasks = TaskManager::new();
        pest_control.register_tasks(&mut tasks);

        (MinigameContext::new(pest_control, world), tasks)
    }

    /// Session first so a wave launched this tick starts with a full timer
    pub fn register_tasks<W: World>(&self, tasks: &mut TaskManager<MinigameContext<Self, W>>) {
        tasks.submit(ProcessTask);
        for boat in BoatTier::ALL {
            tasks.submit(BoatLobbyTask::new(boat, &self.config));
        }
    }

    pub fn config(&self) -> &MinigameConfig {
        &self.config
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn queue(&self, boat: BoatTier) -> &BoatQueue {
        &self.boats[boat.index()]
    }

    /// Players waiting across all boats
    pub fn queued_players(&self) -> usize {
        self.boats.iter().map(BoatQueue::len).sum()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Board a player onto a boat.
    ///
    /// Returns false if they were already aboard. Nothing changes when the
    /// player cannot be reached.
    pub fn join_queue<W: World>(
        &mut self,
        world: &mut W,
        player: PlayerId,
        boat: BoatTier,
    ) -> Result<bool, WorldError> {
        if let Err(e) = self.boats[boat.index()].enqueue(player) {
            warn!("Not adding player to queue: {}", e);
            return Ok(false);
        }

        if let Err(e) = self.greet(world, player, boat) {
            self.boats[boat.index()].remove(player);
            return Err(e);
        }
        Ok(true)
    }

    fn greet<W: World>(&self, world: &mut W, player: PlayerId, boat: BoatTier) -> Result<(), WorldError> {
        let points = world.points(player)?;
        world.send_message(player, "You have joined the Pest Control boat.")?;
        world.send_message(
            player,
            &format!("You currently have {} Pest Control Points.", points),
        )?;
        world.send_message(
            player,
            &format!(
                "Players needed: {} to {} players.",
                self.config.launch_min_players(),
                self.config.launch_max_players()
            ),
        )?;
        world.move_player(player, boat.enter_location())
    }

    /// Take a player off a boat, e.g. when they walk down the gang plank
    pub fn leave_queue(&mut self, player: PlayerId, boat: BoatTier) -> bool {
        self.boats[boat.index()].remove(player)
    }

    /// Run one lobby tick for `lobby`'s boat, arming the session on launch
    pub fn run_lobby<W: World>(&mut self, lobby: &mut BoatLobbyTask, world: &mut W) -> LobbyTick {
        let boat = lobby.boat();
        let tick = lobby.run(&mut self.boats[boat.index()], world);

        if let LobbyTick::Launched { transferred, .. } = &tick {
            if !transferred.is_empty() {
                self.stats.players_launched += transferred.len() as u64;
                if self.session.arm(world, boat.defilers()) {
                    self.stats.sessions_armed += 1;
                }
            }
        }
        tick
    }

    /// Settle the session with `outcome` and reset it
    pub fn end_game<W: World>(
        &mut self,
        world: &mut W,
        outcome: SessionOutcome,
    ) -> Result<SettlementReport, TickFault> {
        let report = settlement::settle(
            &mut self.session,
            world,
            outcome,
            self.config.damage_threshold,
        )?;

        match outcome {
            SessionOutcome::Victory => self.stats.victories += 1,
            SessionOutcome::Defeat => self.stats.defeats += 1,
        }
        self.stats.points_awarded += report.points_awarded();
        Ok(report)
    }
}

impl<W: World> Minigame<W> for PestControl {
    fn name(&self) -> &'static str {
        "Pest Control"
    }

    fn init(&mut self, world: &mut W) {
        if self.session.spawned().is_empty() {
            self.session.spawn_island(world);
        }
        info!(
            npcs = self.session.spawned().len(),
            boats = self.boats.len(),
            "Pest Control initialised"
        );
    }

    fn first_click_object(&mut self, _world: &mut W, _player: PlayerId, _object: GameObject) -> bool {
        false
    }

    fn handle_button_click(&mut self, _world: &mut W, _player: PlayerId, _button: u32) -> bool {
        false
    }

    fn process(&mut self, world: &mut W) -> Result<(), TickFault> {
        if let Some(outcome) = self.session.advance(world)? {
            self.end_game(world, outcome)?;
        }
        Ok(())
    }
}
