//! Target legality
//!
//! `TargetValidator` combines two structural rules with the predicate table
//! to decide whether a character can be chosen as the target of a card play
//! or hero power, and to enumerate every legal target.

use crate::core::{CardDescriptor, Character, PlayRequirement, Playable, PlayerId};
use crate::game::GameState;
use crate::targeting::predicates::{PredicateContext, PredicateTable};
use std::fmt;

/// Why a target was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Untouchable,
    /// Stealthed minion controlled by the other side
    StealthedEnemy,
    Requirement(PlayRequirement),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Untouchable => write!(f, "untouchable"),
            Rejection::StealthedEnemy => write!(f, "stealthed enemy minion"),
            Rejection::Requirement(req) => write!(f, "{}", req),
        }
    }
}

/// Whether a card's requirements ask for a target list at all
///
/// Conditional requirements only announce a list here; the conditions are
/// checked per candidate.
pub fn needs_target_list(card: &CardDescriptor) -> bool {
    card.must_have_target()
        || card.combo_target()
        || card.target_if_available()
        || card.conditional_on_dragon_in_hand()
        || card.conditional_on_elemental_last_turn()
        || card.conditional_on_minimum_board_size()
        || card.conditional_on_minimum_secrets()
}

/// Target validation against one game context
#[derive(Debug, Clone, Copy)]
pub struct TargetValidator<'a> {
    game: &'a GameState,
    table: &'a PredicateTable,
}

impl<'a> TargetValidator<'a> {
    /// Validator using the standard predicate table
    pub fn new(game: &'a GameState) -> Self {
        TargetValidator {
            game,
            table: PredicateTable::standard(),
        }
    }

    pub fn with_table(game: &'a GameState, table: &'a PredicateTable) -> Self {
        TargetValidator { game, table }
    }

    pub fn needs_target_list(&self, card: &CardDescriptor) -> bool {
        needs_target_list(card)
    }

    /// All legal targets for `actor`, in the order player one hero,
    /// player two hero, player one board, player two board
    pub fn valid_targets(&self, actor: &Playable) -> Vec<Character<'a>> {
        if !needs_target_list(&actor.card) {
            return Vec::new();
        }
        self.candidates()
            .filter(|target| self.targeting_requirements(actor, *target))
            .collect()
    }

    fn candidates(&self) -> impl Iterator<Item = Character<'a>> + 'a {
        let game = self.game;
        let heroes = [PlayerId::One, PlayerId::Two]
            .into_iter()
            .map(move |p| Character::Hero(&game.player(p).hero));
        let boards = [PlayerId::One, PlayerId::Two]
            .into_iter()
            .flat_map(move |p| game.player(p).board.iter().map(Character::Minion));
        heroes.chain(boards)
    }

    /// Whether `target` satisfies the structural rules and every requirement
    pub fn targeting_requirements(&self, actor: &Playable, target: Character<'_>) -> bool {
        self.first_failing_requirement(actor, target).is_none()
    }

    /// The first rule that rejects `target`, or None if it is legal
    pub fn first_failing_requirement(&self, actor: &Playable, target: Character<'_>) -> Option<Rejection> {
        if target.is_untouchable() {
            return Some(Rejection::Untouchable);
        }
        if target.is_minion() && target.has_stealth() && target.controller() != actor.controller {
            return Some(Rejection::StealthedEnemy);
        }

        let ctx = PredicateContext::new(actor, target, self.game);
        actor
            .card
            .requirements
            .iter()
            .find(|req| !self.table.evaluate(req, &ctx))
            .map(|req| Rejection::Requirement(*req))
    }

    /// Whether playing `actor` at `target` (or with no target) is legal
    pub fn is_valid_play_target(&self, actor: &Playable, target: Option<Character<'_>>) -> bool {
        match target {
            None => {
                if actor.card.must_have_target() {
                    return false;
                }
                !needs_target_list(&actor.card) || self.valid_targets(actor).is_empty()
            }
            Some(target) => {
                if target.is_untouchable() {
                    return false;
                }
                self.valid_targets(actor).iter().any(|t| t.id() == target.id())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardEffect, Minion, RequirementTag};
    use std::sync::Arc;

    fn hand_card(game: &mut GameState, card: CardDescriptor) -> Playable {
        let id = game.add_to_hand(PlayerId::One, Arc::new(card));
        game.playable(id).unwrap().clone()
    }

    #[test]
    fn test_untargeted_card_has_no_targets() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        game.add_minion(PlayerId::Two, "Yeti", 4, 5);
        let actor = hand_card(&mut game, CardDescriptor::spell("Arcane Intellect", 3, CardEffect::Draw(2)));

        let validator = TargetValidator::new(&game);
        assert!(!validator.needs_target_list(&actor.card));
        assert!(validator.valid_targets(&actor).is_empty());
        assert!(validator.is_valid_play_target(&actor, None));
    }

    #[test]
    fn test_target_order() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        let theirs = game.add_minion(PlayerId::Two, "Theirs", 1, 1);
        let ours = game.add_minion(PlayerId::One, "Ours", 1, 1);
        let actor = hand_card(
            &mut game,
            CardDescriptor::spell("Moonfire", 0, CardEffect::Damage(1)).with_requirement(RequirementTag::TargetToPlay),
        );

        let validator = TargetValidator::new(&game);
        let ids: Vec<_> = validator.valid_targets(&actor).iter().map(|t| t.id()).collect();
        let p1_hero = game.player(PlayerId::One).hero.stats.id;
        let p2_hero = game.player(PlayerId::Two).hero.stats.id;
        assert_eq!(ids, vec![p1_hero, p2_hero, ours, theirs]);
    }

    #[test]
    fn test_structural_exclusions() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        let id = game.next_id();
        game.player_mut(PlayerId::Two)
            .board
            .push(Minion::new(id, PlayerId::Two, "Worgen Infiltrator", 2, 1).with_stealth());
        let own_stealth = game.next_id();
        game.player_mut(PlayerId::One)
            .board
            .push(Minion::new(own_stealth, PlayerId::One, "Shade", 1, 1).with_stealth());
        let ghost = game.next_id();
        game.player_mut(PlayerId::One)
            .board
            .push(Minion::new(ghost, PlayerId::One, "Ghost", 1, 1).untouchable());
        let actor = hand_card(
            &mut game,
            CardDescriptor::spell("Moonfire", 0, CardEffect::Damage(1)).with_requirement(RequirementTag::TargetToPlay),
        );

        let validator = TargetValidator::new(&game);
        let stealthed = game.character(id).unwrap();
        assert_eq!(
            validator.first_failing_requirement(&actor, stealthed),
            Some(Rejection::StealthedEnemy)
        );
        assert!(validator.targeting_requirements(&actor, game.character(own_stealth).unwrap()));

        let untouchable = game.character(ghost).unwrap();
        assert_eq!(
            validator.first_failing_requirement(&actor, untouchable),
            Some(Rejection::Untouchable)
        );
        assert!(!validator.is_valid_play_target(&actor, Some(untouchable)));
    }

    #[test]
    fn test_first_failing_requirement_reports_attack_threshold() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        let weak = game.add_minion(PlayerId::One, "Weak", 2, 2);
        let strong = game.add_minion(PlayerId::One, "Strong", 3, 2);
        let actor = hand_card(
            &mut game,
            CardDescriptor::spell("Rally", 1, CardEffect::Buff { attack: 1, health: 1 })
                .with_requirement(RequirementTag::TargetToPlay)
                .with_requirement(RequirementTag::FriendlyTarget)
                .with_requirement(PlayRequirement::with_param(RequirementTag::TargetMinAttack, 3)),
        );

        let validator = TargetValidator::new(&game);
        assert_eq!(
            validator.first_failing_requirement(&actor, game.character(weak).unwrap()),
            Some(Rejection::Requirement(PlayRequirement::with_param(
                RequirementTag::TargetMinAttack,
                3
            )))
        );
        let ids: Vec<_> = validator.valid_targets(&actor).iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![strong]);
    }

    #[test]
    fn test_play_without_target() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        let required = hand_card(
            &mut game,
            CardDescriptor::spell("Execute", 1, CardEffect::Destroy)
                .with_requirement(RequirementTag::TargetToPlay)
                .with_requirement(RequirementTag::MinionTarget)
                .with_requirement(RequirementTag::DamagedTarget),
        );
        let optional = hand_card(
            &mut game,
            CardDescriptor::minion("Elven Archer", 1, 1, 1)
                .with_effect(CardEffect::Damage(1))
                .with_requirement(RequirementTag::TargetIfAvailable)
                .with_requirement(RequirementTag::MinionTarget),
        );

        let validator = TargetValidator::new(&game);
        assert!(!validator.is_valid_play_target(&required, None));
        assert!(validator.is_valid_play_target(&optional, None));

        game.add_minion(PlayerId::Two, "Yeti", 4, 5);
        let validator = TargetValidator::new(&game);
        assert!(!validator.is_valid_play_target(&optional, None));
    }
}
