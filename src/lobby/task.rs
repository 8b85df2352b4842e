//! Per-boat lobby task
//!
//! Counts down while enough players are aboard and launches them onto the
//! island in waves.

use tracing::{debug, info, warn};

use crate::config::MinigameConfig;
use crate::game::constants::{locations, npc};
use crate::game::task::{Task, TaskStatus, TickFault};
use crate::lobby::boat::{BoatQueue, BoatTier};
use crate::minigame::pest_control::PestControl;
use crate::minigame::MinigameContext;
use crate::world::{DialogueExpression, PlayerId, World, WorldError};

pub const BRIEFING: [&str; 4] = [
    "You must defend the Void Knight while the portals are",
    "unsummoned. The ritual takes twenty minutes though,",
    "so you can help out by destroying them yourselves!",
    "Now GO GO GO!",
];

pub const PRIORITY_NOTICE: &str = "You have been given priority for the next game!";

/// What one lobby tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyTick {
    /// Not enough players aboard, counter reset
    Waiting,
    /// Counter running
    CountingDown { ticks_left: u32 },
    /// A wave left for the island
    Launched {
        transferred: Vec<PlayerId>,
        remaining: usize,
    },
}

/// Lobby countdown for one boat
#[derive(Debug, Clone)]
pub struct BoatLobbyTask {
    boat: BoatTier,
    wait_ticks: u32,
    default_wait_ticks: u32,
    min_players: usize,
    max_per_launch: usize,
}

impl BoatLobbyTask {
    pub fn new(boat: BoatTier, config: &MinigameConfig) -> Self {
        let default_wait_ticks = config.boat_wait_ticks.max(1);
        Self {
            boat,
            wait_ticks: default_wait_ticks,
            default_wait_ticks,
            min_players: config.launch_min_players(),
            max_per_launch: config.launch_max_players(),
        }
    }

    pub fn boat(&self) -> BoatTier {
        self.boat
    }

    /// Ticks until the next launch if the boat stays full enough
    pub fn wait_ticks(&self) -> u32 {
        self.wait_ticks
    }

    /// One tick of the lobby countdown
    pub fn run<W: World>(&mut self, queue: &mut BoatQueue, world: &mut W) -> LobbyTick {
        if queue.len() < self.min_players {
            self.wait_ticks = self.default_wait_ticks;
            return LobbyTick::Waiting;
        }

        self.wait_ticks = self.wait_ticks.saturating_sub(1);
        if self.wait_ticks > 0 {
            return LobbyTick::CountingDown {
                ticks_left: self.wait_ticks,
            };
        }
        self.wait_ticks = self.default_wait_ticks;

        let mut transferred = Vec::new();
        for player in queue.drain_front(self.max_per_launch) {
            match move_to_game(world, player) {
                Ok(()) => transferred.push(player),
                Err(e) => warn!(boat = %self.boat, player = %player, "Skipping launch: {}", e),
            }
        }

        for player in queue.iter() {
            if let Err(e) = world.send_message(*player, PRIORITY_NOTICE) {
                debug!(player = %player, "Priority notice not delivered: {}", e);
            }
        }

        info!(
            boat = %self.boat,
            transferred = transferred.len(),
            remaining = queue.len(),
            "Boat launched"
        );

        LobbyTick::Launched {
            transferred,
            remaining: queue.len(),
        }
    }
}

fn move_to_game<W: World>(world: &mut W, player: PlayerId) -> Result<(), WorldError> {
    world.move_player(player, locations::LAUNCHER_BOAT_BOUNDARY)?;
    world.send_dialogue(player, npc::VOID_KNIGHT, &BRIEFING, DialogueExpression::Distressed)
}

impl<W: World> Task<MinigameContext<PestControl, W>> for BoatLobbyTask {
    fn name(&self) -> &str {
        self.boat.name()
    }

    fn execute(
        &mut self,
        ctx: &mut MinigameContext<PestControl, W>,
    ) -> Result<TaskStatus, TickFault> {
        ctx.minigame.run_lobby(self, &mut ctx.world);
        Ok(TaskStatus::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::sim::SimWorld;
    use crate::world::Area;

    fn setup(players: usize, wait: u32) -> (BoatLobbyTask, BoatQueue, SimWorld, Vec<PlayerId>) {
        let config = MinigameConfig {
            boat_wait_ticks: wait,
            ..MinigameConfig::default()
        };
        let task = BoatLobbyTask::new(BoatTier::Novice, &config);
        let mut queue = BoatQueue::new(BoatTier::Novice);
        let mut world = SimWorld::new();
        let mut ids = Vec::new();
        for i in 0..players {
            let id = world.add_player(format!("P{}", i), BoatTier::Novice.enter_location());
            queue.enqueue(id).unwrap();
            ids.push(id);
        }
        (task, queue, world, ids)
    }

    #[test]
    fn test_single_player_never_counts_down() {
        let (mut task, mut queue, mut world, _) = setup(1, 60);

        for _ in 0..200 {
            assert_eq!(task.run(&mut queue, &mut world), LobbyTick::Waiting);
            assert_eq!(task.wait_ticks(), 60);
        }
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_counter_resets_when_queue_thins() {
        let (mut task, mut queue, mut world, ids) = setup(2, 60);

        for _ in 0..30 {
            task.run(&mut queue, &mut world);
        }
        assert_eq!(task.wait_ticks(), 30);

        queue.remove(ids[1]);
        task.run(&mut queue, &mut world);
        assert_eq!(task.wait_ticks(), 60);
    }

    #[test]
    fn test_launch_after_wait() {
        let (mut task, mut queue, mut world, ids) = setup(2, 60);

        for tick in 1..60 {
            assert_eq!(
                task.run(&mut queue, &mut world),
                LobbyTick::CountingDown { ticks_left: 60 - tick }
            );
        }

        let outcome = task.run(&mut queue, &mut world);
        assert_eq!(
            outcome,
            LobbyTick::Launched {
                transferred: ids.clone(),
                remaining: 0
            }
        );
        assert_eq!(task.wait_ticks(), 60);

        let on_island = world.players_in_area(Area::Game).unwrap();
        assert_eq!(on_island.len(), 2);
        for id in ids {
            let player = world.player(id).unwrap();
            assert_eq!(player.dialogues[0].lines.len(), BRIEFING.len());
            assert_eq!(player.dialogues[0].expression, DialogueExpression::Distressed);
        }
    }

    #[test]
    fn test_batch_cap_and_priority_notice() {
        let (mut task, mut queue, mut world, ids) = setup(40, 1);

        let outcome = task.run(&mut queue, &mut world);

        match outcome {
            LobbyTick::Launched {
                transferred,
                remaining,
            } => {
                assert_eq!(transferred, ids[..25].to_vec());
                assert_eq!(remaining, 15);
            }
            other => panic!("expected launch, got {:?}", other),
        }
        assert_eq!(queue.len(), 15);
        for id in &ids[25..] {
            let player = world.player(*id).unwrap();
            assert!(player.was_told(PRIORITY_NOTICE));
            assert_eq!(player.location, BoatTier::Novice.enter_location());
        }
        for id in &ids[..25] {
            assert!(!world.player(*id).unwrap().was_told(PRIORITY_NOTICE));
        }
    }

    #[test]
    fn test_logged_out_player_skipped() {
        let (mut task, mut queue, mut world, ids) = setup(3, 1);
        world.remove_player(ids[0]);

        let outcome = task.run(&mut queue, &mut world);

        assert_eq!(
            outcome,
            LobbyTick::Launched {
                transferred: ids[1..].to_vec(),
                remaining: 0
            }
        );
    }
}
