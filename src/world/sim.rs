//! In-memory world
//!
//! Holds just enough player and NPC state to drive the minigame without a
//! full engine. Every outbound message is recorded so callers can inspect
//! what a player was told.

use hashbrown::HashMap;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::game::constants::npc;
use crate::util::location::Location;
use crate::world::{Area, DialogueExpression, NpcHandle, NpcId, PlayerId, World, WorldError};

/// A dialogue box as delivered to a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueRecord {
    pub speaker: NpcId,
    pub lines: SmallVec<[String; 4]>,
    pub expression: DialogueExpression,
}

#[derive(Debug, Clone)]
pub struct SimPlayer {
    pub name: String,
    pub location: Location,
    pub points: u32,
    pub attributes: HashMap<String, i64>,
    pub messages: Vec<String>,
    pub dialogues: Vec<DialogueRecord>,
}

impl SimPlayer {
    fn new(name: String, location: Location) -> Self {
        Self {
            name,
            location,
            points: 0,
            attributes: HashMap::new(),
            messages: Vec::new(),
            dialogues: Vec::new(),
        }
    }

    /// Whether any received chat message contains `needle`
    pub fn was_told(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

#[derive(Debug, Clone)]
pub struct SimNpc {
    pub npc_id: NpcId,
    pub location: Location,
    pub hitpoints: u32,
    pub dying: bool,
}

/// World engine stand-in
#[derive(Debug, Default)]
pub struct SimWorld {
    players: HashMap<PlayerId, SimPlayer>,
    npcs: HashMap<NpcHandle, SimNpc>,
    next_handle: u64,
    area_faults: Vec<Area>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a player in at `location`
    pub fn add_player(&mut self, name: impl Into<String>, location: Location) -> PlayerId {
        let id = Uuid::new_v4();
        self.players.insert(id, SimPlayer::new(name.into(), location));
        id
    }

    /// Log a player out
    pub fn remove_player(&mut self, player: PlayerId) -> Option<SimPlayer> {
        self.players.remove(&player)
    }

    pub fn player(&self, player: PlayerId) -> Option<&SimPlayer> {
        self.players.get(&player)
    }

    pub fn player_mut(&mut self, player: PlayerId) -> Option<&mut SimPlayer> {
        self.players.get_mut(&player)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn npc(&self, handle: NpcHandle) -> Option<&SimNpc> {
        self.npcs.get(&handle)
    }

    /// Handles of live NPCs with the given definition id
    pub fn find_npcs(&self, npc_id: NpcId) -> Vec<NpcHandle> {
        let mut handles: Vec<NpcHandle> = self
            .npcs
            .iter()
            .filter(|(_, n)| n.npc_id == npc_id && !n.dying)
            .map(|(h, _)| *h)
            .collect();
        handles.sort_by_key(|h| h.0);
        handles
    }

    /// Number of NPCs not yet flagged for removal
    pub fn live_npc_count(&self) -> usize {
        self.npcs.values().filter(|n| !n.dying).count()
    }

    pub fn set_npc_hitpoints(&mut self, handle: NpcHandle, hitpoints: u32) -> Result<(), WorldError> {
        let npc = self
            .npcs
            .get_mut(&handle)
            .ok_or(WorldError::NpcNotFound(handle))?;
        npc.hitpoints = hitpoints;
        Ok(())
    }

    /// Apply damage to an NPC, returning the hit points left
    pub fn damage_npc(&mut self, handle: NpcHandle, amount: u32) -> Result<u32, WorldError> {
        let npc = self
            .npcs
            .get_mut(&handle)
            .ok_or(WorldError::NpcNotFound(handle))?;
        npc.hitpoints = npc.hitpoints.saturating_sub(amount);
        Ok(npc.hitpoints)
    }

    /// Make membership queries for `area` fail until restored
    pub fn set_area_unavailable(&mut self, area: Area, unavailable: bool) {
        self.area_faults.retain(|a| *a != area);
        if unavailable {
            self.area_faults.push(area);
        }
    }

    fn player_entry(&mut self, player: PlayerId) -> Result<&mut SimPlayer, WorldError> {
        self.players
            .get_mut(&player)
            .ok_or(WorldError::PlayerNotFound(player))
    }
}

impl World for SimWorld {
    fn spawn_npc(&mut self, npc_id: NpcId, location: Location) -> NpcHandle {
        self.next_handle += 1;
        let handle = NpcHandle(self.next_handle);
        self.npcs.insert(
            handle,
            SimNpc {
                npc_id,
                location,
                hitpoints: npc::default_hitpoints(npc_id),
                dying: false,
            },
        );
        handle
    }

    fn npc_id(&self, handle: NpcHandle) -> Option<NpcId> {
        self.npcs.get(&handle).filter(|n| !n.dying).map(|n| n.npc_id)
    }

    fn npc_hitpoints(&self, handle: NpcHandle) -> Option<u32> {
        self.npcs.get(&handle).filter(|n| !n.dying).map(|n| n.hitpoints)
    }

    fn mark_for_removal(&mut self, handle: NpcHandle) -> Result<(), WorldError> {
        let npc = self
            .npcs
            .get_mut(&handle)
            .ok_or(WorldError::NpcNotFound(handle))?;
        npc.dying = true;
        Ok(())
    }

    fn players_in_area(&self, area: Area) -> Result<Vec<PlayerId>, WorldError> {
        if self.area_faults.contains(&area) {
            return Err(WorldError::AreaUnavailable(area));
        }
        Ok(self
            .players
            .iter()
            .filter(|(_, p)| area.contains(p.location))
            .map(|(id, _)| *id)
            .collect())
    }

    fn move_player(&mut self, player: PlayerId, location: Location) -> Result<(), WorldError> {
        self.player_entry(player)?.location = location;
        Ok(())
    }

    fn send_message(&mut self, player: PlayerId, message: &str) -> Result<(), WorldError> {
        self.player_entry(player)?.messages.push(message.to_string());
        Ok(())
    }

    fn send_dialogue(
        &mut self,
        player: PlayerId,
        speaker: NpcId,
        lines: &[&str],
        expression: DialogueExpression,
    ) -> Result<(), WorldError> {
        self.player_entry(player)?.dialogues.push(DialogueRecord {
            speaker,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            expression,
        });
        Ok(())
    }

    fn attribute(&self, player: PlayerId, key: &str) -> Result<Option<i64>, WorldError> {
        let entry = self
            .players
            .get(&player)
            .ok_or(WorldError::PlayerNotFound(player))?;
        Ok(entry.attributes.get(key).copied())
    }

    fn set_attribute(&mut self, player: PlayerId, key: &str, value: i64) -> Result<(), WorldError> {
        self.player_entry(player)?
            .attributes
            .insert(key.to_string(), value);
        Ok(())
    }

    fn points(&self, player: PlayerId) -> Result<u32, WorldError> {
        self.players
            .get(&player)
            .map(|p| p.points)
            .ok_or(WorldError::PlayerNotFound(player))
    }

    fn add_points(&mut self, player: PlayerId, amount: u32) -> Result<u32, WorldError> {
        let entry = self.player_entry(player)?;
        entry.points = entry.points.saturating_add(amount);
        Ok(entry.points)
    }
}
