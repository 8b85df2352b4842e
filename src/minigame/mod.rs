//! Minigame plumbing
//!
//! A minigame and the world it runs in travel together in a
//! [`MinigameContext`], which is what every scheduled task receives.

pub mod pest_control;

use serde::{Deserialize, Serialize};

use crate::game::task::{Task, TaskStatus, TickFault};
use crate::util::location::Location;
use crate::world::{PlayerId, World};

/// A clicked scenery object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: u32,
    pub location: Location,
}

/// Hooks a minigame exposes to the rest of the server
pub trait Minigame<W: World> {
    fn name(&self) -> &'static str;

    /// One-time setup before the first tick
    fn init(&mut self, world: &mut W);

    /// Returns true if the click was handled
    fn first_click_object(&mut self, world: &mut W, player: PlayerId, object: GameObject) -> bool;

    /// Returns true if the button was handled
    fn handle_button_click(&mut self, world: &mut W, player: PlayerId, button: u32) -> bool;

    /// Advance one tick
    fn process(&mut self, world: &mut W) -> Result<(), TickFault>;
}

/// Everything a minigame task may touch during a tick
pub struct MinigameContext<M, W> {
    pub minigame: M,
    pub world: W,
}

impl<M, W> MinigameContext<M, W> {
    pub fn new(minigame: M, world: W) -> Self {
        Self { minigame, world }
    }
}

/// Calls [`Minigame::process`] every tick
#[derive(Debug, Default)]
pub struct ProcessTask;

impl<M: Minigame<W>, W: World> Task<MinigameContext<M, W>> for ProcessTask {
    fn name(&self) -> &str {
        "minigame-process"
    }

    fn execute(&mut self, ctx: &mut MinigameContext<M, W>) -> Result<TaskStatus, TickFault> {
        ctx.minigame.process(&mut ctx.world)?;
        Ok(TaskStatus::Continue)
    }
}
