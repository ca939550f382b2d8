//! Attacker-to-target assignment
//!
//! Given the legal minion attacks at a decision point, pick one target per
//! attacker so that the total attack of the enemy minions killed is as high
//! as possible. The search is a single coordinate pass, not an exhaustive
//! one: each attacker in turn tries every one of its targets while the
//! others stay fixed, and keeps the best.

use crate::core::EntityId;
use crate::game::{Action, GameState};
use rustc_hash::FxHashMap;

/// One attacker and the attacks it may make
#[derive(Debug, Clone)]
pub struct AttackerOptions {
    pub attacker: EntityId,
    pub attacks: Vec<Action>,
}

/// A chosen target index per attacker and the assignment's value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub choices: Vec<usize>,
    pub value: i32,
}

/// Group minion attacks by attacker, in order of first appearance
pub fn group_by_attacker(attacks: &[Action]) -> Vec<AttackerOptions> {
    let mut slots: FxHashMap<EntityId, usize> = FxHashMap::default();
    let mut groups: Vec<AttackerOptions> = Vec::new();
    for action in attacks {
        let Action::MinionAttack { attacker, .. } = action else {
            continue;
        };
        let slot = *slots.entry(*attacker).or_insert_with(|| {
            groups.push(AttackerOptions {
                attacker: *attacker,
                attacks: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].attacks.push(action.clone());
    }
    groups
}

/// Coordinate-search solver for board-clearing attacks
#[derive(Debug, Clone, Copy)]
pub struct AttackAssignmentSolver<'a> {
    state: &'a GameState,
}

impl<'a> AttackAssignmentSolver<'a> {
    pub fn new(state: &'a GameState) -> Self {
        AttackAssignmentSolver { state }
    }

    /// Attack of the target if this attack kills it, else 0
    pub fn kill_value(&self, action: &Action) -> i32 {
        let (Some(attacker), Some(target)) = (action.source(), action.target_id()) else {
            return 0;
        };
        let (Some(attacker), Some(target)) = (self.state.character(attacker), self.state.character(target)) else {
            return 0;
        };
        if attacker.attack() >= target.health() {
            target.attack()
        } else {
            0
        }
    }

    /// Total kill value of an assignment
    pub fn score(&self, groups: &[AttackerOptions], choices: &[usize]) -> i32 {
        groups
            .iter()
            .zip(choices)
            .map(|(group, &choice)| group.attacks.get(choice).map_or(0, |a| self.kill_value(a)))
            .sum()
    }

    /// Best assignment found by one coordinate pass from all-first
    ///
    /// Only strict improvements are committed, so ties keep the earlier
    /// target.
    pub fn assign(&self, groups: &[AttackerOptions]) -> Assignment {
        let mut choices = vec![0; groups.len()];
        let mut value = self.score(groups, &choices);

        for (i, group) in groups.iter().enumerate() {
            let mut best_choice = choices[i];
            for j in 0..group.attacks.len() {
                choices[i] = j;
                let candidate = self.score(groups, &choices);
                if candidate > value {
                    value = candidate;
                    best_choice = j;
                }
            }
            choices[i] = best_choice;
        }

        Assignment { choices, value }
    }

    /// The first attacker's attack under the best assignment
    pub fn solve(&self, attacks: &[Action]) -> Option<Action> {
        let groups = group_by_attacker(attacks);
        let assignment = self.assign(&groups);
        let first = groups.first()?;
        first.attacks.get(assignment.choices[0]).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::game::TargetRef;

    fn attack(game: &GameState, attacker: EntityId, target: EntityId) -> Action {
        let source = game.character(attacker).unwrap();
        Action::MinionAttack {
            player: source.controller(),
            attacker,
            name: source.name().into(),
            target: TargetRef::from(game.character(target).unwrap()),
        }
    }

    #[test]
    fn test_grouping_preserves_first_appearance() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        let a = game.add_minion(PlayerId::One, "A", 2, 2);
        let b = game.add_minion(PlayerId::One, "B", 2, 2);
        let t = game.add_minion(PlayerId::Two, "T", 1, 1);
        let u = game.add_minion(PlayerId::Two, "U", 1, 1);
        let attacks = vec![attack(&game, b, t), attack(&game, a, t), attack(&game, b, u)];

        let groups = group_by_attacker(&attacks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].attacker, b);
        assert_eq!(groups[0].attacks.len(), 2);
        assert_eq!(groups[1].attacker, a);
    }

    #[test]
    fn test_two_attacker_scenario() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        let a = game.add_minion(PlayerId::One, "A", 3, 3);
        let b = game.add_minion(PlayerId::One, "B", 1, 1);
        let x = game.add_minion(PlayerId::Two, "X", 2, 5);
        let y = game.add_minion(PlayerId::Two, "Y", 4, 3);
        let attacks = vec![
            attack(&game, a, x),
            attack(&game, a, y),
            attack(&game, b, x),
            attack(&game, b, y),
        ];

        let solver = AttackAssignmentSolver::new(&game);
        let groups = group_by_attacker(&attacks);
        let assignment = solver.assign(&groups);
        assert_eq!(assignment.choices, vec![1, 0]);
        assert_eq!(assignment.value, 4);
        assert_eq!(solver.solve(&attacks), Some(attack(&game, a, y)));
    }

    #[test]
    fn test_value_never_below_default() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        let a = game.add_minion(PlayerId::One, "A", 2, 3);
        let b = game.add_minion(PlayerId::One, "B", 5, 3);
        let x = game.add_minion(PlayerId::Two, "X", 6, 2);
        let y = game.add_minion(PlayerId::Two, "Y", 7, 5);
        let attacks = vec![
            attack(&game, a, x),
            attack(&game, a, y),
            attack(&game, b, y),
            attack(&game, b, x),
        ];

        let solver = AttackAssignmentSolver::new(&game);
        let groups = group_by_attacker(&attacks);
        let default_value = solver.score(&groups, &[0, 0]);
        let assignment = solver.assign(&groups);
        assert!(assignment.value >= default_value);
        assert_eq!(assignment.value, 13);
    }

    #[test]
    fn test_no_attacks() {
        let game = GameState::new_two_player("Alice", "Bob", 30);
        assert_eq!(AttackAssignmentSolver::new(&game).solve(&[]), None);
    }
}
