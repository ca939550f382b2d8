//! Player actions
//!
//! An `Action` names its source and target by entity ID and carries the
//! names only for display. Two actions are the same move when their
//! canonical text forms match; a stored plan uses that to decide whether a
//! precomputed action is still on offer.

use crate::core::{CardName, Character, EntityId, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the target of an action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub id: EntityId,
    pub name: CardName,
}

impl TargetRef {
    pub fn new(id: EntityId, name: impl Into<CardName>) -> Self {
        TargetRef { id, name: name.into() }
    }
}

impl<'a> From<Character<'a>> for TargetRef {
    fn from(character: Character<'a>) -> Self {
        TargetRef::new(character.id(), character.name())
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.id)
    }
}

/// A move a player can make
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    EndTurn {
        player: PlayerId,
    },
    PlayCard {
        player: PlayerId,
        card: EntityId,
        name: CardName,
        target: Option<TargetRef>,
    },
    HeroPower {
        player: PlayerId,
        power: EntityId,
        name: CardName,
        target: Option<TargetRef>,
    },
    MinionAttack {
        player: PlayerId,
        attacker: EntityId,
        name: CardName,
        target: TargetRef,
    },
    HeroAttack {
        player: PlayerId,
        hero: EntityId,
        name: CardName,
        target: TargetRef,
    },
}

impl Action {
    pub fn player(&self) -> PlayerId {
        match self {
            Action::EndTurn { player }
            | Action::PlayCard { player, .. }
            | Action::HeroPower { player, .. }
            | Action::MinionAttack { player, .. }
            | Action::HeroAttack { player, .. } => *player,
        }
    }

    /// Entity performing the action (None for end turn)
    pub fn source(&self) -> Option<EntityId> {
        match self {
            Action::EndTurn { .. } => None,
            Action::PlayCard { card, .. } => Some(*card),
            Action::HeroPower { power, .. } => Some(*power),
            Action::MinionAttack { attacker, .. } => Some(*attacker),
            Action::HeroAttack { hero, .. } => Some(*hero),
        }
    }

    pub fn target(&self) -> Option<&TargetRef> {
        match self {
            Action::EndTurn { .. } => None,
            Action::PlayCard { target, .. } | Action::HeroPower { target, .. } => target.as_ref(),
            Action::MinionAttack { target, .. } | Action::HeroAttack { target, .. } => Some(target),
        }
    }

    pub fn target_id(&self) -> Option<EntityId> {
        self.target().map(|t| t.id)
    }

    /// Card plays and hero powers: the actions the lookahead search explores
    pub fn is_card_play(&self) -> bool {
        matches!(self, Action::PlayCard { .. } | Action::HeroPower { .. })
    }

    pub fn is_end_turn(&self) -> bool {
        matches!(self, Action::EndTurn { .. })
    }

    /// Canonical text form
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Structural equality by canonical text form
    pub fn matches(&self, other: &Action) -> bool {
        self.canonical() == other.canonical()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::EndTurn { player } => write!(f, "[END_TURN] {}", player),
            Action::PlayCard {
                player,
                card,
                name,
                target,
            } => {
                write!(f, "[PLAY_CARD] {} => {}[{}]", player, name, card)?;
                if let Some(target) = target {
                    write!(f, " -> {}", target)?;
                }
                Ok(())
            }
            Action::HeroPower {
                player,
                power,
                name,
                target,
            } => {
                write!(f, "[HERO_POWER] {} => {}[{}]", player, name, power)?;
                if let Some(target) = target {
                    write!(f, " -> {}", target)?;
                }
                Ok(())
            }
            Action::MinionAttack {
                player,
                attacker,
                name,
                target,
            } => write!(f, "[MINION_ATTACK] {} => {}[{}] -> {}", player, name, attacker, target),
            Action::HeroAttack {
                player,
                hero,
                name,
                target,
            } => write!(f, "[HERO_ATTACK] {} => {}[{}] -> {}", player, name, hero, target),
        }
    }
}

/// Find the offered action that structurally matches `wanted`
pub fn find_matching<'a>(offered: &'a [Action], wanted: &Action) -> Option<&'a Action> {
    let canonical = wanted.canonical();
    offered.iter().find(|a| a.canonical() == canonical)
}
