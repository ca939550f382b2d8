//! Sandbox card pool
//!
//! A small set of cards covering the requirement tags the targeting rules
//! check: plain minions, keyword minions, targeted battlecries with
//! conditional requirements, targeted spells and hero powers.

use crate::core::{CardDescriptor, CardEffect, PlayRequirement, Race, Rarity, RequirementTag as T};
use crate::{Result, TavernError};
use rustc_hash::FxHashMap;
use std::sync::Arc;

fn with_param(tag: T, param: i32) -> PlayRequirement {
    PlayRequirement::with_param(tag, param)
}

fn minions() -> Vec<CardDescriptor> {
    vec![
        CardDescriptor::minion("Wisp", 0, 1, 1),
        CardDescriptor::minion("Murloc Raider", 1, 2, 1).with_race(Race::Murloc),
        CardDescriptor::minion("Argent Squire", 1, 1, 1).with_minion(|m| m.divine_shield = true),
        CardDescriptor::minion("Worgen Infiltrator", 1, 2, 1).with_minion(|m| m.stealth = true),
        CardDescriptor::minion("Fire Fly", 1, 1, 2).with_race(Race::Elemental),
        CardDescriptor::minion("Bloodfen Raptor", 2, 3, 2).with_race(Race::Beast),
        CardDescriptor::minion("River Crocolisk", 2, 2, 3).with_race(Race::Beast),
        CardDescriptor::minion("Loot Hoarder", 2, 2, 1).with_minion(|m| m.deathrattle = true),
        CardDescriptor::minion("Faerie Dragon", 2, 3, 2).with_race(Race::Dragon),
        CardDescriptor::minion("Wolfrider", 3, 3, 1).with_minion(|m| m.charge = true),
        CardDescriptor::minion("Young Dragonhawk", 3, 1, 1)
            .with_race(Race::Beast)
            .with_minion(|m| m.windfury = true),
        CardDescriptor::minion("Chillwind Yeti", 4, 4, 5),
        CardDescriptor::minion("Sen'jin Shieldmasta", 4, 3, 5).with_minion(|m| m.taunt = true),
        CardDescriptor::minion("Azure Drake", 5, 4, 4)
            .with_race(Race::Dragon)
            .with_rarity(Rarity::Rare)
            .with_effect(CardEffect::Draw(1)),
        CardDescriptor::minion("Boulderfist Ogre", 6, 6, 7),
        CardDescriptor::minion("Cairne Bloodhoof", 6, 4, 5)
            .with_rarity(Rarity::Legendary)
            .with_minion(|m| m.deathrattle = true),
    ]
}

fn battlecries() -> Vec<CardDescriptor> {
    vec![
        CardDescriptor::minion("Elven Archer", 1, 1, 1)
            .with_effect(CardEffect::Damage(1))
            .with_requirement(T::TargetIfAvailable),
        CardDescriptor::minion("Abusive Sergeant", 1, 1, 1)
            .with_effect(CardEffect::Buff { attack: 2, health: 0 })
            .with_requirement(T::TargetIfAvailable)
            .with_requirement(T::MinionTarget),
        CardDescriptor::minion("Hungry Crab", 1, 1, 2)
            .with_race(Race::Beast)
            .with_effect(CardEffect::Destroy)
            .with_requirement(T::TargetIfAvailable)
            .with_requirement(T::MinionTarget)
            .with_requirement(with_param(T::TargetWithRace, Race::Murloc.id())),
        CardDescriptor::minion("Shattered Sun Cleric", 3, 3, 2)
            .with_effect(CardEffect::Buff { attack: 1, health: 1 })
            .with_requirement(T::TargetIfAvailable)
            .with_requirement(T::MinionTarget)
            .with_requirement(T::FriendlyTarget)
            .with_requirement(T::NonSelfTarget),
        CardDescriptor::minion("SI:7 Agent", 3, 3, 3)
            .with_rarity(Rarity::Rare)
            .with_effect(CardEffect::Damage(2))
            .with_requirement(T::TargetForCombo),
        CardDescriptor::minion("Defender of Argus", 4, 2, 3)
            .with_rarity(Rarity::Rare)
            .with_effect(CardEffect::Buff { attack: 1, health: 1 })
            .with_requirement(with_param(T::TargetIfAvailableAndMinimumFriendlyMinions, 2))
            .with_requirement(T::MinionTarget)
            .with_requirement(T::FriendlyTarget),
        CardDescriptor::minion("Big Game Hunter", 5, 4, 2)
            .with_rarity(Rarity::Epic)
            .with_effect(CardEffect::Destroy)
            .with_requirement(T::TargetIfAvailable)
            .with_requirement(T::MinionTarget)
            .with_requirement(with_param(T::TargetMinAttack, 7)),
        CardDescriptor::minion("Blackwing Corruptor", 5, 5, 4)
            .with_effect(CardEffect::Damage(3))
            .with_requirement(T::TargetIfAvailableAndDragonInHand),
        CardDescriptor::minion("Netherspite Historian", 2, 1, 3)
            .with_race(Race::Dragon)
            .with_effect(CardEffect::Buff { attack: 1, health: 2 })
            .with_requirement(T::TargetIfAvailableAndDragonInHand)
            .with_requirement(T::MinionTarget)
            .with_requirement(T::FriendlyTarget),
        CardDescriptor::minion("Blazecaller", 6, 6, 6)
            .with_race(Race::Elemental)
            .with_effect(CardEffect::Damage(5))
            .with_requirement(T::TargetIfAvailableAndElementalPlayedLastTurn),
        CardDescriptor::minion("Kabal Songstealer", 5, 5, 5)
            .with_effect(CardEffect::Freeze(0))
            .with_requirement(T::TargetIfAvailable)
            .with_requirement(T::MinionTarget)
            .with_requirement(T::EnemyTarget)
            .with_requirement(T::UndamagedTarget),
    ]
}

fn spells() -> Vec<CardDescriptor> {
    vec![
        CardDescriptor::spell("Moonfire", 0, CardEffect::Damage(1)).with_requirement(T::TargetToPlay),
        CardDescriptor::spell("Frostbolt", 2, CardEffect::Freeze(3)).with_requirement(T::TargetToPlay),
        CardDescriptor::spell("Fireball", 4, CardEffect::Damage(6)).with_requirement(T::TargetToPlay),
        CardDescriptor::spell("Ice Lance", 1, CardEffect::Damage(4))
            .with_requirement(T::TargetToPlay)
            .with_requirement(T::FrozenTarget),
        CardDescriptor::spell("Eviscerate", 2, CardEffect::Damage(2)).with_requirement(T::TargetToPlay),
        CardDescriptor::spell("Execute", 1, CardEffect::Destroy)
            .with_requirement(T::TargetToPlay)
            .with_requirement(T::MinionTarget)
            .with_requirement(T::EnemyTarget)
            .with_requirement(T::DamagedTarget),
        CardDescriptor::spell("Shadow Word: Pain", 2, CardEffect::Destroy)
            .with_requirement(T::TargetToPlay)
            .with_requirement(T::MinionTarget)
            .with_requirement(with_param(T::TargetMaxAttack, 3)),
        CardDescriptor::spell("Shadow Word: Death", 3, CardEffect::Destroy)
            .with_requirement(T::TargetToPlay)
            .with_requirement(T::MinionTarget)
            .with_requirement(with_param(T::TargetMinAttack, 5)),
        CardDescriptor::spell("Mark of Nature", 3, CardEffect::Buff { attack: 4, health: 4 })
            .with_requirement(T::TargetToPlay)
            .with_requirement(T::MinionTarget),
        CardDescriptor::spell("Holy Light", 2, CardEffect::Heal(6)).with_requirement(T::TargetToPlay),
        CardDescriptor::spell("Arcane Intellect", 3, CardEffect::Draw(2)),
        CardDescriptor::spell("Shield Block", 3, CardEffect::GainArmor(5)),
        CardDescriptor::spell("Ice Barrier", 3, CardEffect::Secret),
    ]
}

fn hero_powers() -> Vec<CardDescriptor> {
    vec![
        CardDescriptor::hero_power("Fireblast", 2, CardEffect::Damage(1)).with_requirement(T::TargetToPlay),
        CardDescriptor::hero_power("Lesser Heal", 2, CardEffect::Heal(2)).with_requirement(T::TargetToPlay),
        CardDescriptor::hero_power("Armor Up!", 2, CardEffect::GainArmor(2)),
        CardDescriptor::hero_power("Dagger Mastery", 2, CardEffect::HeroAttack(1)),
    ]
}

/// Cards by name
#[derive(Debug, Clone)]
pub struct CardPool {
    cards: FxHashMap<String, Arc<CardDescriptor>>,
}

impl CardPool {
    /// The built-in sandbox cards
    pub fn standard() -> Self {
        let mut cards = FxHashMap::default();
        for card in minions()
            .into_iter()
            .chain(battlecries())
            .chain(spells())
            .chain(hero_powers())
        {
            cards.insert(card.name.as_str().to_string(), Arc::new(card));
        }
        CardPool { cards }
    }

    pub fn get(&self, name: &str) -> Result<Arc<CardDescriptor>> {
        self.cards
            .get(name)
            .cloned()
            .ok_or_else(|| TavernError::InvalidAction(format!("Card not in pool: {}", name)))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.cards.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targeting::needs_target_list;

    #[test]
    fn test_pool_lookup() {
        let pool = CardPool::standard();
        let yeti = pool.get("Chillwind Yeti").unwrap();
        assert!(yeti.is_minion());
        assert_eq!(yeti.cost, 4);
        assert!(pool.get("Leeroy Jenkins").is_err());
        assert!(pool.get("Armor Up!").unwrap().is_hero_power());
    }

    #[test]
    fn test_targeted_cards_announce_target_lists() {
        let pool = CardPool::standard();
        for name in ["Moonfire", "Elven Archer", "SI:7 Agent", "Blackwing Corruptor", "Blazecaller", "Defender of Argus"] {
            assert!(needs_target_list(&pool.get(name).unwrap()), "{}", name);
        }
        for name in ["Wisp", "Arcane Intellect", "Armor Up!"] {
            assert!(!needs_target_list(&pool.get(name).unwrap()), "{}", name);
        }
    }

    #[test]
    fn test_targeted_effects_have_requirements() {
        let pool = CardPool::standard();
        for name in pool.names() {
            let card = pool.get(name).unwrap();
            if card.effect.is_targeted() {
                assert!(needs_target_list(&card), "{} has a targeted effect but no target list", name);
            }
        }
    }
}
