//! Card descriptors and playable card instances

use crate::core::{EntityId, GameEntity, PlayRequirement, PlayerId, Race, Rarity, RequirementTag};
use crate::core::CardName;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// Body of a minion card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinionTemplate {
    pub attack: i32,
    pub health: i32,
    pub taunt: bool,
    pub charge: bool,
    pub windfury: bool,
    pub divine_shield: bool,
    pub stealth: bool,
    pub deathrattle: bool,
}

/// What kind of playable a card is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Minion(MinionTemplate),
    Spell,
    HeroPower,
}

/// Effect a card has when played
///
/// Only the handful of effects the sandbox engine resolves. For minions this
/// is the battlecry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardEffect {
    #[default]
    None,
    /// Deal damage to the target
    Damage(i32),
    /// Restore health to the target
    Heal(i32),
    /// Deal damage to the target and freeze it
    Freeze(i32),
    /// Give the target +attack/+health
    Buff { attack: i32, health: i32 },
    /// Destroy the target minion
    Destroy,
    /// Draw cards
    Draw(u32),
    /// Give the controller's hero armor
    GainArmor(i32),
    /// Give the controller's hero attack for this turn
    HeroAttack(i32),
    /// Put a secret into play
    Secret,
}

impl CardEffect {
    /// Whether the effect needs a target to resolve
    pub fn is_targeted(self) -> bool {
        matches!(
            self,
            CardEffect::Damage(_)
                | CardEffect::Heal(_)
                | CardEffect::Freeze(_)
                | CardEffect::Buff { .. }
                | CardEffect::Destroy
        )
    }
}

/// Immutable description of a card
///
/// Shared between every instance of the card through an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDescriptor {
    pub name: CardName,
    pub cost: u8,
    pub race: Race,
    pub rarity: Rarity,
    pub kind: CardKind,
    pub effect: CardEffect,

    /// Ordered requirement set; evaluated with AND semantics
    pub requirements: SmallVec<[PlayRequirement; 4]>,
}

impl CardDescriptor {
    pub fn new(name: impl Into<CardName>, cost: u8, kind: CardKind) -> Self {
        CardDescriptor {
            name: name.into(),
            cost,
            race: Race::None,
            rarity: Rarity::Common,
            kind,
            effect: CardEffect::None,
            requirements: SmallVec::new(),
        }
    }

    /// A vanilla minion card
    pub fn minion(name: impl Into<CardName>, cost: u8, attack: i32, health: i32) -> Self {
        CardDescriptor::new(
            name,
            cost,
            CardKind::Minion(MinionTemplate {
                attack,
                health,
                ..MinionTemplate::default()
            }),
        )
    }

    pub fn spell(name: impl Into<CardName>, cost: u8, effect: CardEffect) -> Self {
        CardDescriptor::new(name, cost, CardKind::Spell).with_effect(effect)
    }

    pub fn hero_power(name: impl Into<CardName>, cost: u8, effect: CardEffect) -> Self {
        CardDescriptor::new(name, cost, CardKind::HeroPower).with_effect(effect)
    }

    pub fn with_effect(mut self, effect: CardEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_race(mut self, race: Race) -> Self {
        self.race = race;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<PlayRequirement>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    /// Apply a tweak to the minion body (no-op for non-minions)
    pub fn with_minion(mut self, f: impl FnOnce(&mut MinionTemplate)) -> Self {
        if let CardKind::Minion(ref mut template) = self.kind {
            f(template);
        }
        self
    }

    pub fn is_minion(&self) -> bool {
        matches!(self.kind, CardKind::Minion(_))
    }

    pub fn is_hero_power(&self) -> bool {
        matches!(self.kind, CardKind::HeroPower)
    }

    pub fn has_requirement(&self, tag: RequirementTag) -> bool {
        self.requirements.iter().any(|r| r.tag == tag)
    }

    // Derived shortcuts over the requirement set

    pub fn must_have_target(&self) -> bool {
        self.has_requirement(RequirementTag::TargetToPlay)
    }

    pub fn target_if_available(&self) -> bool {
        self.has_requirement(RequirementTag::TargetIfAvailable)
    }

    pub fn combo_target(&self) -> bool {
        self.has_requirement(RequirementTag::TargetForCombo)
    }

    pub fn conditional_on_dragon_in_hand(&self) -> bool {
        self.has_requirement(RequirementTag::TargetIfAvailableAndDragonInHand)
    }

    pub fn conditional_on_elemental_last_turn(&self) -> bool {
        self.has_requirement(RequirementTag::TargetIfAvailableAndElementalPlayedLastTurn)
    }

    pub fn conditional_on_minimum_board_size(&self) -> bool {
        self.has_requirement(RequirementTag::TargetIfAvailableAndMinimumFriendlyMinions)
    }

    pub fn conditional_on_minimum_secrets(&self) -> bool {
        self.has_requirement(RequirementTag::TargetIfAvailableAndMinimumFriendlySecrets)
    }
}

/// A card instance that can be played: a card in hand or a hero power
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playable {
    pub id: EntityId,
    pub controller: PlayerId,
    pub card: Arc<CardDescriptor>,
}

impl Playable {
    pub fn new(id: EntityId, controller: PlayerId, card: Arc<CardDescriptor>) -> Self {
        Playable { id, controller, card }
    }

    pub fn cost(&self) -> u8 {
        self.card.cost
    }
}

impl GameEntity for Playable {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        self.card.name.as_str()
    }
}
