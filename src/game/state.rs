//! Main game state structure
//!
//! `GameState` is both the live context the engine owns and the snapshot
//! type `simulate` hands back. It is cheap to clone (card descriptors are
//! shared through `Arc`), and the decision core only ever reads it.

use crate::core::{CardDescriptor, Character, EntityId, Hero, Minion, Playable, PlayerId, Race};
use crate::{Result, TavernError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maximum number of minions on one side of the board
pub const MAX_BOARD_SIZE: usize = 7;

/// Maximum number of cards in hand
pub const MAX_HAND_SIZE: usize = 10;

/// Maximum mana crystals
pub const MAX_MANA: u8 = 10;

/// Everything one player controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub hero: Hero,
    pub hero_power: Option<Playable>,
    pub hero_power_used: bool,

    /// Board zone, in board order
    pub board: Vec<Minion>,
    pub hand: Vec<Playable>,
    /// Top of the deck is the last element
    pub deck: Vec<Playable>,

    pub secrets: u32,
    pub combo_active: bool,
    pub elementals_played_this_turn: u32,
    pub elementals_played_last_turn: u32,

    pub mana: u8,
    pub max_mana: u8,
    /// Damage the next draw from an empty deck deals
    pub fatigue: i32,
}

impl PlayerState {
    pub fn new(id: PlayerId, name: impl Into<String>, hero: Hero) -> Self {
        PlayerState {
            id,
            name: name.into(),
            hero,
            hero_power: None,
            hero_power_used: false,
            board: Vec::new(),
            hand: Vec::new(),
            deck: Vec::new(),
            secrets: 0,
            combo_active: false,
            elementals_played_this_turn: 0,
            elementals_played_last_turn: 0,
            mana: 0,
            max_mana: 0,
            fatigue: 0,
        }
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn board_count(&self) -> usize {
        self.board.len()
    }

    pub fn board_full(&self) -> bool {
        self.board.len() >= MAX_BOARD_SIZE
    }

    /// Whether any card in hand is a dragon
    pub fn dragon_in_hand(&self) -> bool {
        self.hand.iter().any(|p| p.card.race == Race::Dragon)
    }

    pub fn minion(&self, id: EntityId) -> Option<&Minion> {
        self.board.iter().find(|m| m.stats.id == id)
    }

    pub fn minion_mut(&mut self, id: EntityId) -> Option<&mut Minion> {
        self.board.iter_mut().find(|m| m.stats.id == id)
    }

    pub fn hand_card(&self, id: EntityId) -> Option<&Playable> {
        self.hand.iter().find(|p| p.id == id)
    }
}

/// Complete game state for a two-player match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub players: [PlayerState; 2],

    /// Whose turn it is
    pub current: PlayerId,

    /// Turn counter, starting at 1
    pub turn: u32,

    /// Unified entity ID generator
    next_entity_id: u32,
}

impl GameState {
    /// Create a new game with two heroes and empty zones
    pub fn new_two_player(player1_name: &str, player2_name: &str, hero_health: i32) -> Self {
        let p1_hero = Hero::new(EntityId::new(1), PlayerId::One, format!("{} Hero", player1_name), hero_health);
        let p2_hero = Hero::new(EntityId::new(2), PlayerId::Two, format!("{} Hero", player2_name), hero_health);

        GameState {
            players: [
                PlayerState::new(PlayerId::One, player1_name, p1_hero),
                PlayerState::new(PlayerId::Two, player2_name, p2_hero),
            ],
            current: PlayerId::One,
            turn: 1,
            next_entity_id: 3,
        }
    }

    /// Get next entity ID (unified across all entity types)
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    pub fn current_player(&self) -> &PlayerState {
        self.player(self.current)
    }

    pub fn current_opponent(&self) -> &PlayerState {
        self.player(self.current.opponent())
    }

    /// Look up a hero or board minion by ID
    pub fn character(&self, id: EntityId) -> Option<Character<'_>> {
        for player in &self.players {
            if player.hero.stats.id == id {
                return Some(Character::Hero(&player.hero));
            }
            if let Some(minion) = player.minion(id) {
                return Some(Character::Minion(minion));
            }
        }
        None
    }

    /// Look up a card in hand or a hero power by ID
    pub fn playable(&self, id: EntityId) -> Option<&Playable> {
        self.players.iter().find_map(|player| {
            player
                .hand_card(id)
                .or_else(|| player.hero_power.as_ref().filter(|hp| hp.id == id))
        })
    }

    pub fn minion_mut(&mut self, id: EntityId) -> Option<&mut Minion> {
        self.players.iter_mut().find_map(|p| p.minion_mut(id))
    }

    /// Winner once a hero has died; None while the game is running or on a draw
    pub fn winner(&self) -> Option<PlayerId> {
        let one_dead = self.players[0].hero.is_dead();
        let two_dead = self.players[1].hero.is_dead();
        match (one_dead, two_dead) {
            (false, true) => Some(PlayerId::One),
            (true, false) => Some(PlayerId::Two),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.players.iter().any(|p| p.hero.is_dead())
    }

    // Setup helpers

    /// Summon a vanilla minion at the end of a player's board
    pub fn add_minion(&mut self, player: PlayerId, name: &str, attack: i32, health: i32) -> EntityId {
        let id = self.next_id();
        self.player_mut(player).board.push(Minion::new(id, player, name, attack, health));
        id
    }

    /// Put a new instance of a card into a player's hand
    pub fn add_to_hand(&mut self, player: PlayerId, card: Arc<CardDescriptor>) -> EntityId {
        let id = self.next_id();
        self.player_mut(player).hand.push(Playable::new(id, player, card));
        id
    }

    /// Put a new instance of a card on top of a player's deck
    pub fn add_to_deck(&mut self, player: PlayerId, card: Arc<CardDescriptor>) -> EntityId {
        let id = self.next_id();
        self.player_mut(player).deck.push(Playable::new(id, player, card));
        id
    }

    pub fn set_hero_power(&mut self, player: PlayerId, card: Arc<CardDescriptor>) -> EntityId {
        let id = self.next_id();
        self.player_mut(player).hero_power = Some(Playable::new(id, player, card));
        id
    }

    /// Mutable minion lookup that reports a missing entity
    pub fn require_minion_mut(&mut self, id: EntityId) -> Result<&mut Minion> {
        self.minion_mut(id).ok_or(TavernError::EntityNotFound(id.as_u32()))
    }
}
