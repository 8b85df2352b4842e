use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::constants::monsters;
use crate::util::location::Location;
use crate::world::{Area, NpcId, PlayerId};

/// Boat difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoatTier {
    Novice,
    Intermediate,
    Veteran,
}

impl BoatTier {
    pub const ALL: [BoatTier; 3] = [BoatTier::Novice, BoatTier::Intermediate, BoatTier::Veteran];

    /// Stable index into per-tier arrays
    pub fn index(&self) -> usize {
        match self {
            BoatTier::Novice => 0,
            BoatTier::Intermediate => 1,
            BoatTier::Veteran => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoatTier::Novice => "NOVICE",
            BoatTier::Intermediate => "INTERMEDIATE",
            BoatTier::Veteran => "VETERAN",
        }
    }

    /// Tile players are placed on when boarding
    pub fn enter_location(&self) -> Location {
        match self {
            BoatTier::Novice => Location::ground(2661, 2639),
            BoatTier::Intermediate => Location::ground(2638, 2644),
            BoatTier::Veteran => Location::ground(2634, 2651),
        }
    }

    pub fn area(&self) -> Area {
        match self {
            BoatTier::Novice => Area::NoviceBoat,
            BoatTier::Intermediate => Area::IntermediateBoat,
            BoatTier::Veteran => Area::VeteranBoat,
        }
    }

    /// Defilers spawned for games launched from this boat
    pub fn defilers(&self) -> &'static [NpcId] {
        match self {
            BoatTier::Novice => monsters::NOVICE_DEFILERS,
            BoatTier::Intermediate => monsters::INTERMEDIATE_DEFILERS,
            BoatTier::Veteran => monsters::VETERAN_DEFILERS,
        }
    }
}

impl fmt::Display for BoatTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Players waiting on one boat, first come first served
#[derive(Debug, Clone)]
pub struct BoatQueue {
    boat: BoatTier,
    queue: VecDeque<PlayerId>,
}

impl BoatQueue {
    pub fn new(boat: BoatTier) -> Self {
        Self {
            boat,
            queue: VecDeque::new(),
        }
    }

    pub fn boat(&self) -> BoatTier {
        self.boat
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.queue.contains(&player)
    }

    /// Zero-based place in line
    pub fn position(&self, player: PlayerId) -> Option<usize> {
        self.queue.iter().position(|p| *p == player)
    }

    /// Append a player, returning the new queue length
    pub fn enqueue(&mut self, player: PlayerId) -> Result<usize, QueueError> {
        if self.contains(player) {
            return Err(QueueError::DuplicateQueueEntry {
                player,
                boat: self.boat,
            });
        }
        self.queue.push_back(player);
        Ok(self.queue.len())
    }

    /// Remove a player wherever they are in line
    pub fn remove(&mut self, player: PlayerId) -> bool {
        match self.position(player) {
            Some(index) => self.queue.remove(index).is_some(),
            None => false,
        }
    }

    /// Take up to `max` players from the front
    pub fn drain_front(&mut self, max: usize) -> Vec<PlayerId> {
        let count = max.min(self.queue.len());
        self.queue.drain(..count).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.queue.iter()
    }
}

/// Queue errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Player {player} is already queued on the {boat} boat")]
    DuplicateQueueEntry { player: PlayerId, boat: BoatTier },
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_enqueue_fifo() {
        let mut queue = BoatQueue::new(BoatTier::Novice);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(queue.enqueue(a), Ok(1));
        assert_eq!(queue.enqueue(b), Ok(2));

        assert_eq!(queue.position(a), Some(0));
        assert_eq!(queue.drain_front(1), vec![a]);
        assert_eq!(queue.position(b), Some(0));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut queue = BoatQueue::new(BoatTier::Veteran);
        let a = Uuid::new_v4();

        queue.enqueue(a).unwrap();
        let result = queue.enqueue(a);

        assert_eq!(
            result,
            Err(QueueError::DuplicateQueueEntry {
                player: a,
                boat: BoatTier::Veteran
            })
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut queue = BoatQueue::new(BoatTier::Novice);
        let ids: Vec<PlayerId> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            queue.enqueue(*id).unwrap();
        }

        assert!(queue.remove(ids[1]));
        assert!(!queue.remove(ids[1]));
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_drain_front_caps() {
        let mut queue = BoatQueue::new(BoatTier::Novice);
        for _ in 0..40 {
            queue.enqueue(Uuid::new_v4()).unwrap();
        }

        assert_eq!(queue.drain_front(25).len(), 25);
        assert_eq!(queue.len(), 15);
        assert_eq!(queue.drain_front(25).len(), 15);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_enter_locations_on_board() {
        for boat in BoatTier::ALL {
            assert!(boat.area().contains(boat.enter_location()));
            assert_eq!(BoatTier::ALL[boat.index()], boat);
            assert!(!boat.defilers().is_empty());
        }
    }
}
