//! Heroes and minions
//!
//! Owned `Hero` and `Minion` values live in the game state. Code that does
//! not care which one it has works through `Character`, a borrowed tagged
//! variant with a uniform set of read accessors. Minion-only checks match on
//! the variant explicitly.

use crate::core::{CardName, EntityId, GameEntity, MinionTemplate, PlayerId, Race, Rarity};
use serde::{Deserialize, Serialize};

/// State shared by heroes and minions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub id: EntityId,
    pub controller: PlayerId,
    pub name: CardName,
    pub base_health: i32,
    pub damage: i32,
    pub attack: i32,
    pub race: Race,
    pub rarity: Rarity,
    pub frozen: bool,
    pub stealthed: bool,
    pub taunt: bool,
    pub divine_shield: bool,
    pub windfury: bool,
    pub charge: bool,
    /// Can never be chosen as a target
    pub untouchable: bool,
}

impl CharacterStats {
    pub fn new(id: EntityId, controller: PlayerId, name: impl Into<CardName>, attack: i32, health: i32) -> Self {
        CharacterStats {
            id,
            controller,
            name: name.into(),
            base_health: health,
            damage: 0,
            attack,
            race: Race::None,
            rarity: Rarity::Common,
            frozen: false,
            stealthed: false,
            taunt: false,
            divine_shield: false,
            windfury: false,
            charge: false,
            untouchable: false,
        }
    }

    /// Current health (base health minus accumulated damage)
    pub fn health(&self) -> i32 {
        self.base_health - self.damage
    }
}

/// A player's hero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub stats: CharacterStats,
    pub armor: i32,
    pub attacked_this_turn: bool,
}

impl Hero {
    pub fn new(id: EntityId, controller: PlayerId, name: impl Into<CardName>, health: i32) -> Self {
        let mut stats = CharacterStats::new(id, controller, name, 0, health);
        stats.rarity = Rarity::Free;
        Hero {
            stats,
            armor: 0,
            attacked_this_turn: false,
        }
    }

    pub fn health(&self) -> i32 {
        self.stats.health()
    }

    /// Health plus armor
    pub fn total_health(&self) -> i32 {
        self.stats.health() + self.armor
    }

    pub fn is_dead(&self) -> bool {
        self.stats.health() <= 0
    }
}

impl GameEntity for Hero {
    fn id(&self) -> EntityId {
        self.stats.id
    }

    fn name(&self) -> &str {
        self.stats.name.as_str()
    }
}

/// A minion on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minion {
    pub stats: CharacterStats,
    pub deathrattle: bool,
    pub battlecry: bool,
    /// Summoned this turn and without charge
    pub exhausted: bool,
    pub attacks_this_turn: u8,
}

impl Minion {
    pub fn new(id: EntityId, controller: PlayerId, name: impl Into<CardName>, attack: i32, health: i32) -> Self {
        Minion {
            stats: CharacterStats::new(id, controller, name, attack, health),
            deathrattle: false,
            battlecry: false,
            exhausted: false,
            attacks_this_turn: 0,
        }
    }

    /// Create a minion from a card body
    pub fn from_template(
        id: EntityId,
        controller: PlayerId,
        name: impl Into<CardName>,
        template: &MinionTemplate,
    ) -> Self {
        let mut minion = Minion::new(id, controller, name, template.attack, template.health);
        minion.stats.taunt = template.taunt;
        minion.stats.charge = template.charge;
        minion.stats.windfury = template.windfury;
        minion.stats.divine_shield = template.divine_shield;
        minion.stats.stealthed = template.stealth;
        minion.deathrattle = template.deathrattle;
        minion.exhausted = !template.charge;
        minion
    }

    pub fn health(&self) -> i32 {
        self.stats.health()
    }

    pub fn attack(&self) -> i32 {
        self.stats.attack
    }

    pub fn is_dead(&self) -> bool {
        self.stats.health() <= 0
    }

    /// Number of attacks allowed per turn
    pub fn max_attacks(&self) -> u8 {
        if self.stats.windfury {
            2
        } else {
            1
        }
    }

    pub fn can_attack(&self) -> bool {
        self.stats.attack > 0
            && !self.stats.frozen
            && !self.exhausted
            && self.attacks_this_turn < self.max_attacks()
    }

    // Builder-style setters, mostly for tests and card setup

    pub fn with_taunt(mut self) -> Self {
        self.stats.taunt = true;
        self
    }

    pub fn with_stealth(mut self) -> Self {
        self.stats.stealthed = true;
        self
    }

    pub fn with_windfury(mut self) -> Self {
        self.stats.windfury = true;
        self
    }

    pub fn with_divine_shield(mut self) -> Self {
        self.stats.divine_shield = true;
        self
    }

    pub fn with_charge(mut self) -> Self {
        self.stats.charge = true;
        self.exhausted = false;
        self
    }

    pub fn frozen(mut self) -> Self {
        self.stats.frozen = true;
        self
    }

    pub fn untouchable(mut self) -> Self {
        self.stats.untouchable = true;
        self
    }

    pub fn with_race(mut self, race: Race) -> Self {
        self.stats.race = race;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.stats.rarity = rarity;
        self
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.stats.damage = damage;
        self
    }
}

impl GameEntity for Minion {
    fn id(&self) -> EntityId {
        self.stats.id
    }

    fn name(&self) -> &str {
        self.stats.name.as_str()
    }
}

/// Borrowed view of either kind of character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Character<'a> {
    Hero(&'a Hero),
    Minion(&'a Minion),
}

impl<'a> Character<'a> {
    pub fn stats(&self) -> &'a CharacterStats {
        match self {
            Character::Hero(hero) => &hero.stats,
            Character::Minion(minion) => &minion.stats,
        }
    }

    pub fn id(&self) -> EntityId {
        self.stats().id
    }

    pub fn name(&self) -> &'a str {
        self.stats().name.as_str()
    }

    pub fn controller(&self) -> PlayerId {
        self.stats().controller
    }

    pub fn health(&self) -> i32 {
        self.stats().health()
    }

    pub fn damage(&self) -> i32 {
        self.stats().damage
    }

    /// Armor (always 0 for minions)
    pub fn armor(&self) -> i32 {
        match self {
            Character::Hero(hero) => hero.armor,
            Character::Minion(_) => 0,
        }
    }

    pub fn attack(&self) -> i32 {
        self.stats().attack
    }

    pub fn race(&self) -> Race {
        self.stats().race
    }

    pub fn rarity(&self) -> Rarity {
        self.stats().rarity
    }

    pub fn is_frozen(&self) -> bool {
        self.stats().frozen
    }

    pub fn has_stealth(&self) -> bool {
        self.stats().stealthed
    }

    pub fn has_taunt(&self) -> bool {
        self.stats().taunt
    }

    pub fn has_divine_shield(&self) -> bool {
        self.stats().divine_shield
    }

    pub fn has_windfury(&self) -> bool {
        self.stats().windfury
    }

    pub fn has_charge(&self) -> bool {
        self.stats().charge
    }

    pub fn is_untouchable(&self) -> bool {
        self.stats().untouchable
    }

    pub fn is_hero(&self) -> bool {
        matches!(self, Character::Hero(_))
    }

    pub fn is_minion(&self) -> bool {
        matches!(self, Character::Minion(_))
    }

    pub fn as_minion(&self) -> Option<&'a Minion> {
        match self {
            Character::Minion(minion) => Some(minion),
            Character::Hero(_) => None,
        }
    }
}

impl<'a> From<&'a Hero> for Character<'a> {
    fn from(hero: &'a Hero) -> Self {
        Character::Hero(hero)
    }
}

impl<'a> From<&'a Minion> for Character<'a> {
    fn from(minion: &'a Minion) -> Self {
        Character::Minion(minion)
    }
}
