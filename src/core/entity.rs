//! Entity identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple integer ID for game entities
///
/// Heroes, minions, cards in hand and hero powers all draw their IDs from the
/// same per-game counter, so an ID is unique across both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub fn new(id: u32) -> Self {
        EntityId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one of the two seats at the table
///
/// Kept distinct from `EntityId` so a player can never be confused with a
/// character or card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// The other seat
    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Index into per-player arrays (0 for player one)
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::One => write!(f, "Player1"),
            PlayerId::Two => write!(f, "Player2"),
        }
    }
}

/// Base trait for all game entities
pub trait GameEntity {
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
        assert_eq!(PlayerId::One.index(), 0);
        assert_eq!(PlayerId::Two.index(), 1);
    }

    #[test]
    fn test_entity_id_display() {
        let id = EntityId::new(42);
        assert_eq!(id.as_u32(), 42);
        assert_eq!(id.to_string(), "42");
    }
}
