//! Move planner
//!
//! Sorts the legal actions of a decision point into card plays, minion
//! attacks (face or board) and hero attacks, then picks one with a fixed
//! priority: card plays the selector approves, then minion attacks, then
//! hero attacks, and finally the first legal action.

use crate::ai::attack_solver::AttackAssignmentSolver;
use crate::ai::lookahead::{CardSelector, SearchBudget};
use crate::config::PlannerConfig;
use crate::core::Character;
use crate::game::logger::log_verbose;
use crate::game::{Action, GameState, GameView};

/// Legal actions partitioned for planning, plus the totals the policy needs
#[derive(Debug, Clone, Default)]
pub struct ClassifiedActions {
    /// Card plays and hero powers
    pub cards: Vec<Action>,
    /// Minion attacks on the enemy hero
    pub face_attacks: Vec<Action>,
    /// Minion attacks on enemy minions
    pub board_attacks: Vec<Action>,
    pub hero_attacks: Vec<Action>,
    /// Hero attack on the enemy hero, if offered
    pub hero_face: Option<Action>,
    /// Damage the face attacks (and hero face attack) would deal
    pub face_damage: i32,
    /// Damage the enemy board threatens next turn
    pub incoming_damage: i32,
    /// Own hero health + armor
    pub own_health: i32,
    /// Enemy hero health + armor
    pub enemy_health: i32,
}

impl ClassifiedActions {
    pub fn classify(state: &GameState, options: &[Action]) -> Self {
        let me = state.current_player();
        let enemy = state.current_opponent();
        let enemy_hero = enemy.hero.stats.id;

        let mut sorted = ClassifiedActions {
            own_health: me.hero.total_health(),
            enemy_health: enemy.hero.total_health(),
            ..ClassifiedActions::default()
        };

        for action in options {
            match action {
                Action::MinionAttack { attacker, target, .. } => {
                    if target.id == enemy_hero {
                        if let Some(Character::Minion(minion)) = state.character(*attacker) {
                            sorted.face_damage += minion.attack();
                        }
                        sorted.face_attacks.push(action.clone());
                    } else {
                        sorted.board_attacks.push(action.clone());
                    }
                }
                Action::PlayCard { .. } | Action::HeroPower { .. } => sorted.cards.push(action.clone()),
                Action::HeroAttack { target, .. } => {
                    if target.id == enemy_hero {
                        sorted.face_damage += me.hero.stats.attack;
                        sorted.hero_face = Some(action.clone());
                    }
                    sorted.hero_attacks.push(action.clone());
                }
                Action::EndTurn { .. } => {}
            }
        }

        sorted.incoming_damage = enemy
            .board
            .iter()
            .map(|m| m.attack() * if m.stats.windfury { 2 } else { 1 })
            .sum();
        sorted
    }

    pub fn has_minion_attacks(&self) -> bool {
        !self.face_attacks.is_empty() || !self.board_attacks.is_empty()
    }
}

/// Chooses one action per decision point
#[derive(Debug, Clone)]
pub struct MovePlanner<S> {
    selector: S,
    config: PlannerConfig,
}

impl<S: CardSelector> MovePlanner<S> {
    pub fn new(selector: S, config: PlannerConfig) -> Self {
        MovePlanner { selector, config }
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut S {
        &mut self.selector
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Pick an action from `options`
    ///
    /// Falls back to the first option when no rule fires, and to ending
    /// the turn if nothing is offered at all.
    pub fn plan_move(&mut self, view: &GameView, options: &[Action], budget: &mut SearchBudget) -> Action {
        let state = view.state();
        let Some(first) = options.first() else {
            return Action::EndTurn { player: state.current };
        };
        if options.len() == 1 {
            return first.clone();
        }

        let sorted = ClassifiedActions::classify(state, options);
        log_verbose!(
            view.logger(),
            "{} card play(s), {} face / {} board attack(s), {} hero attack(s); face {} incoming {} health {} vs {}",
            sorted.cards.len(),
            sorted.face_attacks.len(),
            sorted.board_attacks.len(),
            sorted.hero_attacks.len(),
            sorted.face_damage,
            sorted.incoming_damage,
            sorted.own_health,
            sorted.enemy_health,
        );

        if let Some(card) = self.selector.best_card(&sorted.cards, view, budget) {
            return card;
        }

        if sorted.has_minion_attacks() {
            if let Some(attack) = self.minion_attack(state, &sorted) {
                return attack;
            }
        } else if !sorted.hero_attacks.is_empty() {
            if let Some(attack) = self.hero_attack(state, &sorted) {
                return attack;
            }
        }

        first.clone()
    }

    fn minion_attack(&self, state: &GameState, sorted: &ClassifiedActions) -> Option<Action> {
        let solver = AttackAssignmentSolver::new(state);
        let racing = sorted.face_damage > sorted.incoming_damage && sorted.own_health > sorted.enemy_health;
        let lethal = sorted.face_damage >= sorted.enemy_health;

        if !sorted.face_attacks.is_empty() && (racing || lethal) {
            return sorted.face_attacks.first().cloned();
        }
        if !sorted.board_attacks.is_empty() && sorted.incoming_damage > sorted.own_health {
            return solver.solve(&sorted.board_attacks);
        }
        if let Some(face) = sorted.face_attacks.first() {
            return Some(face.clone());
        }
        solver.solve(&sorted.board_attacks)
    }

    fn hero_attack(&self, state: &GameState, sorted: &ClassifiedActions) -> Option<Action> {
        if sorted.hero_face.is_some() && sorted.face_damage >= sorted.enemy_health {
            return sorted.hero_face.clone();
        }

        if sorted.own_health > self.config.hero_attack_health_threshold {
            let hero_attack = state.current_player().hero.stats.attack;
            let mut best: Option<&Action> = None;
            let mut best_score = 0;
            for attack in &sorted.hero_attacks {
                let Some(Character::Minion(target)) = attack.target_id().and_then(|id| state.character(id)) else {
                    continue;
                };
                let score = if target.stats.divine_shield || target.health() > hero_attack {
                    0
                } else {
                    target.attack()
                };
                if score > best_score {
                    best = Some(attack);
                    best_score = score;
                }
            }
            return best
                .filter(|_| sorted.own_health - best_score > self.config.hero_attack_margin)
                .cloned();
        }

        sorted.hero_face.clone()
    }
}
