//! Score settlement
//!
//! Pays out every player on the island once a session ends, sends them back
//! to the outpost and resets the session.

use tracing::{info, warn};

use crate::game::constants::{locations, npc, rewards};
use crate::game::session::{GameSession, SessionOutcome};
use crate::game::task::TickFault;
use crate::world::{Area, DialogueExpression, PlayerId, World, WorldError};

/// What one player receives at the end of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub points: u32,
    pub dialogue: String,
    pub expression: DialogueExpression,
    pub message: String,
}

/// Reward tier for a player given the outcome and their damage dealt
pub fn reward_for(outcome: SessionOutcome, damage: i64, damage_threshold: i64) -> Reward {
    match outcome {
        SessionOutcome::Defeat => {
            let text =
                "You failed to kill all the portals in 3 minutes and have not been awarded points.";
            Reward {
                points: 0,
                dialogue: text.to_string(),
                expression: DialogueExpression::Calm,
                message: text.to_string(),
            }
        }
        SessionOutcome::Victory if damage > damage_threshold => {
            let points = rewards::ELEVATED_POINTS;
            Reward {
                points,
                dialogue: format!(
                    "Congratulations! You helped us defend the Void Knight. We have awarded you {} points.",
                    points
                ),
                expression: DialogueExpression::Happy,
                message: format!(
                    "You have won the pest control game and have been awarded {} Pest Control points.",
                    points
                ),
            }
        }
        SessionOutcome::Victory => {
            let points = rewards::BASE_POINTS;
            Reward {
                points,
                dialogue: format!(
                    "The Void Knights notice your lack of zeal. You only gain {} points.",
                    points
                ),
                expression: DialogueExpression::Distressed,
                message: format!(
                    "You have won the pest control game but were only awarded {} Pest Control points.",
                    points
                ),
            }
        }
    }
}

/// Result of settling one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReport {
    pub outcome: SessionOutcome,
    /// Players paid out, with the points each received
    pub rewarded: Vec<(PlayerId, u32)>,
    /// Players the world could not reach mid-settlement
    pub failed: Vec<(PlayerId, WorldError)>,
}

impl SettlementReport {
    pub fn points_awarded(&self) -> u64 {
        self.rewarded.iter().map(|(_, p)| u64::from(*p)).sum()
    }
}

fn settle_player<W: World>(
    world: &mut W,
    player: PlayerId,
    outcome: SessionOutcome,
    damage_threshold: i64,
) -> Result<u32, WorldError> {
    world.move_player(player, locations::GANG_PLANK_START)?;

    let damage = world
        .attribute(player, rewards::DAMAGE_ATTRIBUTE)?
        .unwrap_or(0);
    let reward = reward_for(outcome, damage, damage_threshold);

    world.send_dialogue(player, npc::VOID_KNIGHT, &[reward.dialogue.as_str()], reward.expression)?;
    world.send_message(player, &reward.message)?;
    if reward.points > 0 {
        world.add_points(player, reward.points)?;
    }
    world.set_attribute(player, rewards::DAMAGE_ATTRIBUTE, 0)?;

    Ok(reward.points)
}

/// Pay out everyone on the island, then reset the session.
///
/// Fails without touching anything if the island's players cannot be listed.
/// A player who drops out part way is logged and skipped.
pub fn settle<W: World>(
    session: &mut GameSession,
    world: &mut W,
    outcome: SessionOutcome,
    damage_threshold: i64,
) -> Result<SettlementReport, TickFault> {
    let players = world.players_in_area(Area::Game)?;

    let mut report = SettlementReport {
        outcome,
        rewarded: Vec::with_capacity(players.len()),
        failed: Vec::new(),
    };

    for player in players {
        match settle_player(world, player, outcome, damage_threshold) {
            Ok(points) => report.rewarded.push((player, points)),
            Err(e) => {
                warn!(player = %player, "Failed to settle player: {}", e);
                report.failed.push((player, e));
            }
        }
    }

    session.clean_up(world);

    info!(
        outcome = ?outcome,
        players = report.rewarded.len(),
        points = report.points_awarded(),
        "Session settled"
    );

    Ok(report)
}
