//! Requirement predicate table
//!
//! Every `RequirementTag` maps to exactly one `PredicateEntry`: a plain
//! function over the acting card, the proposed target and the game, plus a
//! disposition saying whether the entry really checks something. Tags with
//! no behavioral effect are kept as explicit always-pass entries marked
//! `Unimplemented` so they stay visible in the table.

use crate::core::{Character, PlayRequirement, Playable, Race, Rarity, RequirementTag};
use crate::game::{GameState, PlayerState};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Everything a predicate may look at
#[derive(Debug, Clone, Copy)]
pub struct PredicateContext<'a> {
    /// The card being played (or hero power being used)
    pub actor: &'a Playable,
    /// Proposed target
    pub target: Character<'a>,
    /// The actor's controller
    pub controller: &'a PlayerState,
    pub game: &'a GameState,
}

impl<'a> PredicateContext<'a> {
    pub fn new(actor: &'a Playable, target: Character<'a>, game: &'a GameState) -> Self {
        PredicateContext {
            actor,
            target,
            controller: game.player(actor.controller),
            game,
        }
    }

    fn opponent(&self) -> &'a PlayerState {
        self.game.player(self.controller.id.opponent())
    }
}

/// Predicate test: (context, requirement parameter) -> pass
pub type PredicateFn = fn(&PredicateContext<'_>, i32) -> bool;

/// What an entry actually does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The test inspects the target or the controller
    Checked,
    /// Always passes here; another layer applies the rule
    EnforcedElsewhere,
    /// Always passes; the rule has no behavioral effect yet
    Unimplemented,
}

/// One row of the predicate table
#[derive(Debug, Clone, Copy)]
pub struct PredicateEntry {
    pub tag: RequirementTag,
    pub test: PredicateFn,
    pub disposition: Disposition,
    pub description: &'static str,
}

const fn checked(tag: RequirementTag, test: PredicateFn, description: &'static str) -> PredicateEntry {
    PredicateEntry {
        tag,
        test,
        disposition: Disposition::Checked,
        description,
    }
}

const fn elsewhere(tag: RequirementTag, description: &'static str) -> PredicateEntry {
    PredicateEntry {
        tag,
        test: always_pass,
        disposition: Disposition::EnforcedElsewhere,
        description,
    }
}

const fn unimplemented(tag: RequirementTag, description: &'static str) -> PredicateEntry {
    PredicateEntry {
        tag,
        test: always_pass,
        disposition: Disposition::Unimplemented,
        description,
    }
}

fn always_pass(_: &PredicateContext<'_>, _: i32) -> bool {
    true
}

fn is_minion(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.is_minion()
}

fn is_friendly(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.controller() == ctx.controller.id
}

fn is_enemy(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.controller() != ctx.controller.id
}

fn is_damaged(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.damage() > 0
}

fn is_undamaged(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.damage() == 0
}

fn is_frozen(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.is_frozen()
}

// Inverted: a minion that already has charge is rejected
fn lacks_charge(ctx: &PredicateContext<'_>, _: i32) -> bool {
    !matches!(ctx.target, Character::Minion(m) if m.stats.charge)
}

fn is_not_self(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.id() != ctx.actor.id
}

fn has_race(ctx: &PredicateContext<'_>, param: i32) -> bool {
    ctx.target.race().id() == param
}

fn is_hero(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.is_hero()
}

fn is_hero_or_minion(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.is_hero() || ctx.target.is_minion()
}

fn is_minion_or_enemy_hero(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.is_minion() || ctx.target.id() == ctx.opponent().hero.stats.id
}

fn is_taunter(ctx: &PredicateContext<'_>, _: i32) -> bool {
    matches!(ctx.target, Character::Minion(m) if m.stats.taunt)
}

fn is_legendary(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.target.rarity() == Rarity::Legendary
}

fn has_deathrattle(ctx: &PredicateContext<'_>, _: i32) -> bool {
    matches!(ctx.target, Character::Minion(m) if m.deathrattle)
}

fn has_battlecry(ctx: &PredicateContext<'_>, _: i32) -> bool {
    matches!(ctx.target, Character::Minion(m) if m.battlecry)
}

fn attack_at_most(ctx: &PredicateContext<'_>, param: i32) -> bool {
    ctx.target.attack() <= param
}

fn attack_at_least(ctx: &PredicateContext<'_>, param: i32) -> bool {
    ctx.target.attack() >= param
}

fn is_stealthed_minion(ctx: &PredicateContext<'_>, _: i32) -> bool {
    matches!(ctx.target, Character::Minion(m) if m.stats.stealthed)
}

fn enough_friendly_minions(ctx: &PredicateContext<'_>, param: i32) -> bool {
    ctx.controller.board_count() as i64 >= i64::from(param)
}

fn enough_friendly_secrets(ctx: &PredicateContext<'_>, param: i32) -> bool {
    i64::from(ctx.controller.secrets) >= i64::from(param)
}

/// A dragon card needs a second dragon in hand; any other card needs one
fn dragon_condition(ctx: &PredicateContext<'_>, _: i32) -> bool {
    if ctx.actor.card.race == Race::Dragon {
        let mut dragons = ctx.controller.hand.iter().filter(|p| p.card.race == Race::Dragon);
        match (dragons.next(), dragons.next()) {
            (Some(only), None) => only.id != ctx.actor.id,
            _ => true,
        }
    } else {
        ctx.controller.dragon_in_hand()
    }
}

fn elemental_last_turn(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.controller.elementals_played_last_turn >= 1
}

fn combo_active(ctx: &PredicateContext<'_>, _: i32) -> bool {
    ctx.controller.combo_active
}

use RequirementTag as T;

/// The standard table, one row per tag
pub static STANDARD_ENTRIES: &[PredicateEntry] = &[
    checked(T::MinionTarget, is_minion, "target must be a minion"),
    checked(T::FriendlyTarget, is_friendly, "target must be friendly"),
    checked(T::EnemyTarget, is_enemy, "target must be an enemy"),
    checked(T::DamagedTarget, is_damaged, "target must be damaged"),
    checked(T::UndamagedTarget, is_undamaged, "target must be undamaged"),
    checked(T::FrozenTarget, is_frozen, "target must be frozen"),
    checked(T::ChargeTarget, lacks_charge, "target must not already have charge"),
    checked(T::NonSelfTarget, is_not_self, "cannot target self"),
    checked(T::TargetWithRace, has_race, "target must have the given race"),
    checked(T::HeroTarget, is_hero, "target must be a hero"),
    checked(T::HeroOrMinionTarget, is_hero_or_minion, "target must be a hero or minion"),
    checked(T::MinionOrEnemyHero, is_minion_or_enemy_hero, "target must be a minion or the enemy hero"),
    checked(T::MustTargetTaunter, is_taunter, "target must be a minion with taunt"),
    checked(T::LegendaryTarget, is_legendary, "target must be legendary"),
    checked(T::TargetWithDeathrattle, has_deathrattle, "target must be a minion with deathrattle"),
    checked(T::TargetWithBattlecry, has_battlecry, "target must be a minion with battlecry"),
    checked(T::TargetMaxAttack, attack_at_most, "target attack must be at most the parameter"),
    checked(T::TargetMinAttack, attack_at_least, "target attack must be at least the parameter"),
    checked(T::StealthedTarget, is_stealthed_minion, "target must be a stealthed minion"),
    checked(
        T::TargetIfAvailableAndMinimumFriendlyMinions,
        enough_friendly_minions,
        "controller needs at least the parameter minions",
    ),
    checked(
        T::TargetIfAvailableAndMinimumFriendlySecrets,
        enough_friendly_secrets,
        "controller needs at least the parameter secrets",
    ),
    checked(
        T::TargetIfAvailableAndDragonInHand,
        dragon_condition,
        "controller needs another dragon in hand",
    ),
    checked(
        T::TargetIfAvailableAndElementalPlayedLastTurn,
        elemental_last_turn,
        "controller played an elemental last turn",
    ),
    checked(T::TargetForCombo, combo_active, "controller's combo must be active"),
    elsewhere(T::TargetToPlay, "target required; applied by is_valid_play_target"),
    elsewhere(T::TargetIfAvailable, "target required when one exists; applied by is_valid_play_target"),
    elsewhere(T::NumMinionSlots, "board space; applied when generating actions"),
    elsewhere(T::FriendlyMinionDiedThisGame, "playability; applied when generating actions"),
    unimplemented(T::NonstealthEnemyTarget, "enemy target cannot be stealthed"),
    unimplemented(T::MaxSecrets, "secret zone must not be full"),
    unimplemented(T::TargetAttackedThisTurn, "target must have attacked this turn"),
    unimplemented(T::TargetTaunter, "default attack must target taunters"),
    unimplemented(T::CanBeAttacked, "target cannot have 'can't be attacked'"),
    unimplemented(T::TargetMagnet, "must target a magnet minion if one exists"),
    unimplemented(T::CanBeTargetedBySpells, "target can be targeted by spells"),
    unimplemented(T::CanBeTargetedByOpponents, "target can be targeted by opponents"),
    unimplemented(T::CanBeTargetedByHeroPowers, "target can be targeted by hero powers"),
    unimplemented(T::CanBeTargetedByBattlecries, "target can be targeted by battlecries"),
    unimplemented(T::EnemyTargetNotImmune, "enemy target cannot be immune"),
    unimplemented(T::SubcardIsPlayable, "sub-card must be playable"),
    unimplemented(T::FriendlyMinionDiedThisTurn, "a friendly minion died this turn"),
    unimplemented(T::EnemyWeaponEquipped, "enemy must have a weapon"),
    unimplemented(T::SecretZoneCap, "secret zone cap"),
    unimplemented(T::TargetExactCost, "target must have the exact cost"),
    unimplemented(T::MinionSlotOrManaCrystalSlot, "minion slot or mana crystal slot"),
];

/// Lookup table from tag to predicate
#[derive(Debug, Clone)]
pub struct PredicateTable {
    entries: FxHashMap<RequirementTag, PredicateEntry>,
}

impl PredicateTable {
    /// Build a table from explicit rows; later rows replace earlier ones
    pub fn from_entries(rows: &[PredicateEntry]) -> Self {
        let mut entries = FxHashMap::default();
        for row in rows {
            entries.insert(row.tag, *row);
        }
        PredicateTable { entries }
    }

    /// The shared standard table
    pub fn standard() -> &'static PredicateTable {
        static TABLE: OnceLock<PredicateTable> = OnceLock::new();
        TABLE.get_or_init(|| PredicateTable::from_entries(STANDARD_ENTRIES))
    }

    pub fn entry(&self, tag: RequirementTag) -> Option<&PredicateEntry> {
        self.entries.get(&tag)
    }

    /// Evaluate one requirement; a tag with no row passes
    pub fn evaluate(&self, requirement: &PlayRequirement, ctx: &PredicateContext<'_>) -> bool {
        match self.entries.get(&requirement.tag) {
            Some(entry) => (entry.test)(ctx, requirement.param),
            None => true,
        }
    }

    /// Tags whose entries always pass without checking anything
    pub fn unimplemented_tags(&self) -> Vec<RequirementTag> {
        let mut tags: Vec<_> = self
            .entries
            .values()
            .filter(|e| e.disposition == Disposition::Unimplemented)
            .map(|e| e.tag)
            .collect();
        tags.sort_by_key(|t| t.as_str());
        tags
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
