//! Play requirement tags
//!
//! A card declares an ordered list of `PlayRequirement`s. Each one names a
//! legality predicate and, for parameterised predicates, an integer
//! argument (an attack threshold, a race id, a minion count).

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoStaticStr};

/// Identity of one targeting predicate
///
/// Every variant has an entry in the predicate table; see
/// `targeting::predicates` for the test each one performs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum RequirementTag {
    // Structural and stat checks
    MinionTarget,
    FriendlyTarget,
    EnemyTarget,
    DamagedTarget,
    UndamagedTarget,
    FrozenTarget,
    ChargeTarget,
    NonSelfTarget,
    TargetWithRace,
    HeroTarget,
    HeroOrMinionTarget,
    MinionOrEnemyHero,
    MustTargetTaunter,
    LegendaryTarget,
    TargetWithDeathrattle,
    TargetWithBattlecry,
    TargetMaxAttack,
    TargetMinAttack,
    StealthedTarget,

    // Conditional "target if available" checks on the controller
    TargetIfAvailableAndMinimumFriendlyMinions,
    TargetIfAvailableAndMinimumFriendlySecrets,
    TargetIfAvailableAndDragonInHand,
    TargetIfAvailableAndElementalPlayedLastTurn,
    TargetForCombo,

    // Applied outside the per-target check
    TargetToPlay,
    TargetIfAvailable,
    NumMinionSlots,
    FriendlyMinionDiedThisGame,

    // No behavioral effect yet
    NonstealthEnemyTarget,
    MaxSecrets,
    TargetAttackedThisTurn,
    TargetTaunter,
    CanBeAttacked,
    TargetMagnet,
    CanBeTargetedBySpells,
    CanBeTargetedByOpponents,
    CanBeTargetedByHeroPowers,
    CanBeTargetedByBattlecries,
    EnemyTargetNotImmune,
    SubcardIsPlayable,
    FriendlyMinionDiedThisTurn,
    EnemyWeaponEquipped,
    SecretZoneCap,
    TargetExactCost,
    MinionSlotOrManaCrystalSlot,
}

impl RequirementTag {
    /// Stable name for logs
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// One (tag, parameter) pair from a card's requirement set
///
/// Parameterless tags carry 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayRequirement {
    pub tag: RequirementTag,
    pub param: i32,
}

impl PlayRequirement {
    pub fn new(tag: RequirementTag) -> Self {
        PlayRequirement { tag, param: 0 }
    }

    pub fn with_param(tag: RequirementTag, param: i32) -> Self {
        PlayRequirement { tag, param }
    }
}

impl From<RequirementTag> for PlayRequirement {
    fn from(tag: RequirementTag) -> Self {
        PlayRequirement::new(tag)
    }
}

impl std::fmt::Display for PlayRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.param != 0 {
            write!(f, "{}({})", self.tag.as_str(), self.param)
        } else {
            write!(f, "{}", self.tag.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_display() {
        let req = PlayRequirement::with_param(RequirementTag::TargetMinAttack, 3);
        assert_eq!(req.to_string(), "TargetMinAttack(3)");
        let req: PlayRequirement = RequirementTag::MinionTarget.into();
        assert_eq!(req.to_string(), "MinionTarget");
    }
}
