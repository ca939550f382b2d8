//! Sandbox rules engine
//!
//! Just enough of a card game to drive the planners through whole matches:
//! mana crystals, drawing with fatigue, playing minions and spells with
//! targets from `TargetValidator`, hero powers, minion and hero combat with
//! taunt, stealth, divine shield, windfury, charge, freeze and armor.
//! Deathrattles and secrets have no effect beyond being counted.

use crate::core::{CardEffect, CardKind, Character, CharacterStats, EntityId, Hero, Minion, Playable, PlayerId, Race};
use crate::game::{Action, GameEngine, GameState, TargetRef, MAX_HAND_SIZE, MAX_MANA};
use crate::sandbox::deck::BuiltDeck;
use crate::targeting::TargetValidator;
use crate::{Result, TavernError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Cards drawn before the first turn by the first and second player
pub const OPENING_HAND: [usize; 2] = [3, 4];

/// Mutable borrow of either kind of character
enum CharacterMut<'a> {
    Hero(&'a mut Hero),
    Minion(&'a mut Minion),
}

impl<'a> CharacterMut<'a> {
    fn stats(&mut self) -> &mut CharacterStats {
        match self {
            CharacterMut::Hero(hero) => &mut hero.stats,
            CharacterMut::Minion(minion) => &mut minion.stats,
        }
    }

    /// Divine shield absorbs a whole hit; hero armor absorbs first
    fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        match self {
            CharacterMut::Minion(minion) => {
                if minion.stats.divine_shield {
                    minion.stats.divine_shield = false;
                } else {
                    minion.stats.damage += amount;
                }
            }
            CharacterMut::Hero(hero) => {
                let absorbed = amount.min(hero.armor);
                hero.armor -= absorbed;
                hero.stats.damage += amount - absorbed;
            }
        }
    }
}

fn character_mut(state: &mut GameState, id: EntityId) -> Result<CharacterMut<'_>> {
    for player in state.players.iter_mut() {
        if player.hero.stats.id == id {
            return Ok(CharacterMut::Hero(&mut player.hero));
        }
        if let Some(minion) = player.board.iter_mut().find(|m| m.stats.id == id) {
            return Ok(CharacterMut::Minion(minion));
        }
    }
    Err(TavernError::EntityNotFound(id.as_u32()))
}

/// Characters the side `attacker` may attack: taunt minions if any are
/// visible, otherwise the enemy hero and every visible enemy minion
pub fn attack_targets(state: &GameState, attacker: PlayerId) -> Vec<Character<'_>> {
    let enemy = state.player(attacker.opponent());
    let visible = |m: &&Minion| !m.stats.stealthed && !m.stats.untouchable;

    let taunts: Vec<_> = enemy
        .board
        .iter()
        .filter(visible)
        .filter(|m| m.stats.taunt)
        .map(Character::Minion)
        .collect();
    if !taunts.is_empty() {
        return taunts;
    }

    std::iter::once(Character::Hero(&enemy.hero))
        .chain(enemy.board.iter().filter(visible).map(Character::Minion))
        .collect()
}

fn hero_can_attack(hero: &Hero) -> bool {
    hero.stats.attack > 0 && !hero.attacked_this_turn && !hero.stats.frozen
}

/// Reference engine over the sandbox card pool
#[derive(Debug, Clone, Copy, Default)]
pub struct SandboxEngine;

impl SandboxEngine {
    pub fn new() -> Self {
        SandboxEngine
    }

    /// Shuffle both decks, deal opening hands and start the first turn
    pub fn new_game(
        &self,
        names: [&str; 2],
        decks: [&BuiltDeck; 2],
        hero_health: i32,
        seed: u64,
    ) -> GameState {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let mut state = GameState::new_two_player(names[0], names[1], hero_health);

        for (player, deck) in [PlayerId::One, PlayerId::Two].into_iter().zip(decks) {
            state.set_hero_power(player, deck.hero_power.clone());
            let mut cards = deck.cards.clone();
            cards.shuffle(&mut rng);
            for card in cards {
                state.add_to_deck(player, card);
            }
            for _ in 0..OPENING_HAND[player.index()] {
                draw(&mut state, player);
            }
        }

        state.current = PlayerId::One;
        state.turn = 1;
        begin_turn(&mut state);
        state
    }

    fn playable_actions(&self, state: &GameState, actor: &Playable, out: &mut Vec<Action>) {
        let validator = TargetValidator::new(state);
        let make = |target: Option<TargetRef>| {
            if actor.card.is_hero_power() {
                Action::HeroPower {
                    player: actor.controller,
                    power: actor.id,
                    name: actor.card.name.clone(),
                    target,
                }
            } else {
                Action::PlayCard {
                    player: actor.controller,
                    card: actor.id,
                    name: actor.card.name.clone(),
                    target,
                }
            }
        };

        let targets = validator.valid_targets(actor);
        if targets.is_empty() {
            if validator.is_valid_play_target(actor, None) {
                out.push(make(None));
            }
        } else {
            out.extend(targets.into_iter().map(|t| make(Some(TargetRef::from(t)))));
        }
    }

    /// Resolve the target reference of a card play and check it is legal
    fn check_play_target(&self, state: &GameState, actor: &Playable, target: Option<&TargetRef>) -> Result<()> {
        let character = match target {
            Some(t) => Some(state.character(t.id).ok_or(TavernError::EntityNotFound(t.id.as_u32()))?),
            None => None,
        };
        if TargetValidator::new(state).is_valid_play_target(actor, character) {
            Ok(())
        } else {
            Err(TavernError::InvalidAction(format!(
                "illegal target for {}",
                actor.card.name
            )))
        }
    }

    fn play_card(&self, state: &mut GameState, card: EntityId, target: Option<&TargetRef>) -> Result<()> {
        let me = state.current;
        let actor = state
            .player(me)
            .hand_card(card)
            .cloned()
            .ok_or(TavernError::EntityNotFound(card.as_u32()))?;
        if actor.cost() > state.player(me).mana {
            return Err(TavernError::InvalidAction(format!("not enough mana for {}", actor.card.name)));
        }
        if actor.card.is_minion() && state.player(me).board_full() {
            return Err(TavernError::InvalidAction("board is full".to_string()));
        }
        self.check_play_target(state, &actor, target)?;

        let player = state.player_mut(me);
        player.hand.retain(|p| p.id != card);
        player.mana -= actor.cost();

        if let CardKind::Minion(template) = actor.card.kind {
            let mut minion = Minion::from_template(actor.id, me, actor.card.name.clone(), &template);
            minion.stats.race = actor.card.race;
            minion.stats.rarity = actor.card.rarity;
            minion.battlecry = actor.card.effect != CardEffect::None;
            player.board.push(minion);
            if actor.card.race == Race::Elemental {
                player.elementals_played_this_turn += 1;
            }
        }

        resolve_effect(state, me, actor.card.effect, target.map(|t| t.id))?;
        state.player_mut(me).combo_active = true;
        Ok(())
    }

    fn use_hero_power(&self, state: &mut GameState, power: EntityId, target: Option<&TargetRef>) -> Result<()> {
        let me = state.current;
        let player = state.player(me);
        let actor = player
            .hero_power
            .clone()
            .filter(|hp| hp.id == power)
            .ok_or(TavernError::EntityNotFound(power.as_u32()))?;
        if player.hero_power_used {
            return Err(TavernError::InvalidAction("hero power already used".to_string()));
        }
        if actor.cost() > player.mana {
            return Err(TavernError::InvalidAction("not enough mana for hero power".to_string()));
        }
        self.check_play_target(state, &actor, target)?;

        let player = state.player_mut(me);
        player.mana -= actor.cost();
        player.hero_power_used = true;
        resolve_effect(state, me, actor.card.effect, target.map(|t| t.id))
    }

    fn check_attack_target(&self, state: &GameState, target: &TargetRef) -> Result<()> {
        if attack_targets(state, state.current).iter().any(|t| t.id() == target.id) {
            Ok(())
        } else {
            Err(TavernError::InvalidAction(format!("cannot attack {}", target)))
        }
    }

    fn minion_attack(&self, state: &mut GameState, attacker: EntityId, target: &TargetRef) -> Result<()> {
        let me = state.current;
        let minion = state
            .player(me)
            .minion(attacker)
            .ok_or(TavernError::EntityNotFound(attacker.as_u32()))?;
        if !minion.can_attack() {
            return Err(TavernError::InvalidAction(format!("{} cannot attack", minion.stats.name)));
        }
        self.check_attack_target(state, target)?;

        let attack = minion.attack();
        let retaliation = match state.character(target.id) {
            Some(Character::Minion(defender)) => defender.attack(),
            _ => 0,
        };

        character_mut(state, target.id)?.take_damage(attack);
        let minion = state.require_minion_mut(attacker)?;
        minion.attacks_this_turn += 1;
        minion.stats.stealthed = false;
        CharacterMut::Minion(minion).take_damage(retaliation);
        Ok(())
    }

    fn hero_attack(&self, state: &mut GameState, target: &TargetRef) -> Result<()> {
        let me = state.current;
        let hero = &state.player(me).hero;
        if !hero_can_attack(hero) {
            return Err(TavernError::InvalidAction("hero cannot attack".to_string()));
        }
        self.check_attack_target(state, target)?;

        let attack = hero.stats.attack;
        let retaliation = match state.character(target.id) {
            Some(Character::Minion(defender)) => defender.attack(),
            _ => 0,
        };

        character_mut(state, target.id)?.take_damage(attack);
        let hero = &mut state.player_mut(me).hero;
        hero.attacked_this_turn = true;
        CharacterMut::Hero(hero).take_damage(retaliation);
        Ok(())
    }

    fn end_turn(&self, state: &mut GameState) {
        let me = state.current;
        let player = state.player_mut(me);
        player.hero.stats.attack = 0;
        player.hero.stats.frozen = false;
        for minion in &mut player.board {
            minion.stats.frozen = false;
        }

        state.current = me.opponent();
        state.turn += 1;
        begin_turn(state);
    }
}

impl GameEngine for SandboxEngine {
    /// End turn first, then card plays, hero power, minion attacks and
    /// hero attacks
    fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        if state.is_over() {
            return Vec::new();
        }
        let me = state.current_player();
        let mut actions = vec![Action::EndTurn { player: me.id }];

        for card in &me.hand {
            if card.cost() > me.mana || (card.card.is_minion() && me.board_full()) {
                continue;
            }
            self.playable_actions(state, card, &mut actions);
        }

        if let Some(power) = &me.hero_power {
            if !me.hero_power_used && power.cost() <= me.mana {
                self.playable_actions(state, power, &mut actions);
            }
        }

        let targets = attack_targets(state, me.id);
        for minion in me.board.iter().filter(|m| m.can_attack()) {
            actions.extend(targets.iter().map(|t| Action::MinionAttack {
                player: me.id,
                attacker: minion.stats.id,
                name: minion.stats.name.clone(),
                target: TargetRef::from(*t),
            }));
        }

        if hero_can_attack(&me.hero) {
            actions.extend(targets.iter().map(|t| Action::HeroAttack {
                player: me.id,
                hero: me.hero.stats.id,
                name: me.hero.stats.name.clone(),
                target: TargetRef::from(*t),
            }));
        }

        actions
    }

    fn apply(&self, state: &GameState, action: &Action) -> Result<GameState> {
        if state.is_over() {
            return Err(TavernError::GameOver);
        }
        if action.player() != state.current {
            return Err(TavernError::InvalidAction(format!("not {}'s turn: {}", action.player(), action)));
        }

        let mut next = state.clone();
        match action {
            Action::EndTurn { .. } => self.end_turn(&mut next),
            Action::PlayCard { card, target, .. } => self.play_card(&mut next, *card, target.as_ref())?,
            Action::HeroPower { power, target, .. } => self.use_hero_power(&mut next, *power, target.as_ref())?,
            Action::MinionAttack { attacker, target, .. } => self.minion_attack(&mut next, *attacker, target)?,
            Action::HeroAttack { target, .. } => self.hero_attack(&mut next, target)?,
        }
        remove_dead(&mut next);
        Ok(next)
    }
}

/// Refresh mana and attacks for the player whose turn starts, then draw
fn begin_turn(state: &mut GameState) {
    let me = state.current;
    let player = state.player_mut(me);
    player.max_mana = (player.max_mana + 1).min(MAX_MANA);
    player.mana = player.max_mana;
    player.hero_power_used = false;
    player.hero.attacked_this_turn = false;
    player.combo_active = false;
    player.elementals_played_last_turn = player.elementals_played_this_turn;
    player.elementals_played_this_turn = 0;
    for minion in &mut player.board {
        minion.exhausted = false;
        minion.attacks_this_turn = 0;
    }
    draw(state, me);
}

/// Draw the top card; an empty deck deals increasing fatigue damage and a
/// full hand burns the card
fn draw(state: &mut GameState, player: PlayerId) {
    let player = state.player_mut(player);
    match player.deck.pop() {
        Some(card) => {
            if player.hand.len() < MAX_HAND_SIZE {
                player.hand.push(card);
            }
        }
        None => {
            player.fatigue += 1;
            let fatigue = player.fatigue;
            CharacterMut::Hero(&mut player.hero).take_damage(fatigue);
        }
    }
}

fn resolve_effect(state: &mut GameState, me: PlayerId, effect: CardEffect, target: Option<EntityId>) -> Result<()> {
    match (effect, target) {
        (CardEffect::Damage(amount), Some(id)) => character_mut(state, id)?.take_damage(amount),
        (CardEffect::Heal(amount), Some(id)) => {
            let mut character = character_mut(state, id)?;
            let stats = character.stats();
            stats.damage = (stats.damage - amount).max(0);
        }
        (CardEffect::Freeze(amount), Some(id)) => {
            let mut character = character_mut(state, id)?;
            character.take_damage(amount);
            character.stats().frozen = true;
        }
        (CardEffect::Buff { attack, health }, Some(id)) => {
            let mut character = character_mut(state, id)?;
            let stats = character.stats();
            stats.attack += attack;
            stats.base_health += health;
        }
        (CardEffect::Destroy, Some(id)) => {
            if let CharacterMut::Minion(minion) = character_mut(state, id)? {
                minion.stats.damage = minion.stats.base_health;
            }
        }
        (CardEffect::Draw(count), _) => {
            for _ in 0..count {
                draw(state, me);
            }
        }
        (CardEffect::GainArmor(amount), _) => state.player_mut(me).hero.armor += amount,
        (CardEffect::HeroAttack(amount), _) => state.player_mut(me).hero.stats.attack += amount,
        (CardEffect::Secret, _) => state.player_mut(me).secrets += 1,
        // Targeted effect played without a target
        (_, None) | (CardEffect::None, _) => {}
    }
    Ok(())
}

fn remove_dead(state: &mut GameState) {
    for player in state.players.iter_mut() {
        player.board.retain(|m| !m.is_dead());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardDescriptor;
    use crate::sandbox::{CardPool, DeckList};
    use std::sync::Arc;

    fn empty_game() -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        game.player_mut(PlayerId::One).mana = 10;
        game.player_mut(PlayerId::One).max_mana = 10;
        game
    }

    fn card(game: &mut GameState, name: &str) -> EntityId {
        let pool = CardPool::standard();
        game.add_to_hand(PlayerId::One, pool.get(name).unwrap())
    }

    #[test]
    fn test_end_turn_is_first() {
        let game = empty_game();
        let actions = SandboxEngine.legal_actions(&game);
        assert_eq!(actions, vec![Action::EndTurn { player: PlayerId::One }]);
    }

    #[test]
    fn test_targeted_spell_offers_every_valid_target() {
        let mut game = empty_game();
        let yeti = game.add_minion(PlayerId::Two, "Chillwind Yeti", 4, 5);
        card(&mut game, "Moonfire");

        let plays: Vec<_> = SandboxEngine
            .legal_actions(&game)
            .into_iter()
            .filter(Action::is_card_play)
            .collect();
        let targets: Vec<_> = plays.iter().filter_map(Action::target_id).collect();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[2], yeti);
    }

    #[test]
    fn test_required_target_without_candidates_is_not_offered() {
        let mut game = empty_game();
        card(&mut game, "Execute");
        game.add_minion(PlayerId::Two, "Chillwind Yeti", 4, 5);
        // Undamaged enemy: Execute has no target and cannot be played
        assert!(SandboxEngine.legal_actions(&game).iter().all(|a| !a.is_card_play()));
    }

    #[test]
    fn test_optional_battlecry_without_targets_plays_untargeted() {
        let mut game = empty_game();
        let id = card(&mut game, "Big Game Hunter");
        game.add_minion(PlayerId::Two, "Chillwind Yeti", 4, 5);
        let plays: Vec<_> = SandboxEngine
            .legal_actions(&game)
            .into_iter()
            .filter(Action::is_card_play)
            .collect();
        assert_eq!(plays.len(), 1);
        assert_eq!(plays[0].source(), Some(id));
        assert_eq!(plays[0].target(), None);

        let next = SandboxEngine.apply(&game, &plays[0]).unwrap();
        assert_eq!(next.player(PlayerId::One).board.len(), 1);
        assert_eq!(next.player(PlayerId::One).mana, 5);
        assert!(next.player(PlayerId::One).combo_active);
    }

    #[test]
    fn test_taunt_restricts_attacks() {
        let mut game = empty_game();
        game.add_minion(PlayerId::One, "Raptor", 3, 2);
        let id = game.next_id();
        game.player_mut(PlayerId::Two)
            .board
            .push(Minion::new(id, PlayerId::Two, "Shieldmasta", 3, 5).with_taunt());
        game.add_minion(PlayerId::Two, "Wisp", 1, 1);

        let attacks: Vec<_> = SandboxEngine
            .legal_actions(&game)
            .into_iter()
            .filter(|a| matches!(a, Action::MinionAttack { .. }))
            .collect();
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].target_id(), Some(id));
    }

    #[test]
    fn test_combat_divine_shield_and_death() {
        let mut game = empty_game();
        let raptor = game.add_minion(PlayerId::One, "Raptor", 3, 2);
        let id = game.next_id();
        game.player_mut(PlayerId::Two)
            .board
            .push(Minion::new(id, PlayerId::Two, "Squire", 1, 1).with_divine_shield());
        let attack = SandboxEngine
            .legal_actions(&game)
            .into_iter()
            .find(|a| a.target_id() == Some(id))
            .unwrap();

        let next = SandboxEngine.apply(&game, &attack).unwrap();
        let squire = next.player(PlayerId::Two).minion(id).unwrap();
        assert!(!squire.stats.divine_shield);
        assert_eq!(squire.health(), 1);
        assert_eq!(next.player(PlayerId::One).minion(raptor).unwrap().health(), 1);

        // The raptor already attacked this turn
        assert!(SandboxEngine.apply(&next, &attack).is_err());
        // The original state is untouched
        assert!(game.player(PlayerId::Two).minion(id).unwrap().stats.divine_shield);
    }

    #[test]
    fn test_armor_absorbs_damage() {
        let mut game = empty_game();
        game.player_mut(PlayerId::Two).hero.armor = 4;
        card(&mut game, "Fireball");
        let face = game.player(PlayerId::Two).hero.stats.id;
        let play = SandboxEngine
            .legal_actions(&game)
            .into_iter()
            .find(|a| a.is_card_play() && a.target_id() == Some(face))
            .unwrap();
        let next = SandboxEngine.apply(&game, &play).unwrap();
        let hero = &next.player(PlayerId::Two).hero;
        assert_eq!(hero.armor, 0);
        assert_eq!(hero.health(), 28);
    }

    #[test]
    fn test_end_turn_starts_opponent_turn() {
        let mut game = empty_game();
        let id = game.next_id();
        game.player_mut(PlayerId::One)
            .board
            .push(Minion::new(id, PlayerId::One, "Iced", 2, 2).frozen());
        let drawn = game.add_to_deck(PlayerId::Two, Arc::new(CardDescriptor::minion("Wisp", 0, 1, 1)));

        let next = SandboxEngine
            .apply(&game, &Action::EndTurn { player: PlayerId::One })
            .unwrap();
        assert_eq!(next.current, PlayerId::Two);
        assert_eq!(next.turn, 2);
        assert!(!next.player(PlayerId::One).minion(id).unwrap().stats.frozen);
        let bob = next.player(PlayerId::Two);
        assert_eq!(bob.mana, 1);
        assert!(bob.hand_card(drawn).is_some());

        // Bob's deck is now empty: his next draw deals fatigue
        let after = SandboxEngine
            .apply(&next, &Action::EndTurn { player: PlayerId::Two })
            .and_then(|s| SandboxEngine.apply(&s, &Action::EndTurn { player: PlayerId::One }))
            .unwrap();
        assert_eq!(after.player(PlayerId::Two).hero.health(), 29);
    }

    #[test]
    fn test_wrong_player_is_rejected() {
        let game = empty_game();
        let result = SandboxEngine.apply(&game, &Action::EndTurn { player: PlayerId::Two });
        assert!(matches!(result, Err(TavernError::InvalidAction(_))));
    }

    #[test]
    fn test_new_game_is_seeded() {
        let pool = CardPool::standard();
        let aggro = DeckList::resolve("aggro").unwrap().build(&pool).unwrap();
        let control = DeckList::resolve("control").unwrap().build(&pool).unwrap();

        let a = SandboxEngine.new_game(["Alice", "Bob"], [&aggro, &control], 30, 9);
        let b = SandboxEngine.new_game(["Alice", "Bob"], [&aggro, &control], 30, 9);
        assert_eq!(a, b);
        assert_eq!(a.player(PlayerId::One).hand_size(), 4);
        assert_eq!(a.player(PlayerId::Two).hand_size(), 4);
        assert_eq!(a.player(PlayerId::One).mana, 1);
        assert_eq!(a.player(PlayerId::One).deck.len(), 26);
    }
}
