//! Position comparison
//!
//! A coarse ordering over two game states from one side's perspective.
//! Callers only look at the sign of the result.

use crate::core::{Minion, PlayerId};
use crate::game::{GameState, PlayerState};

/// Weight of offense deltas relative to health deltas
pub const OFFENSE_WEIGHT: f64 = 1.5;

/// The numbers a position is judged on, for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideMetrics {
    /// Hero health + armor + health of taunt minions
    pub effective_health: i32,
    /// Hero attack + board attack (windfury doubles, frozen counts zero)
    pub offense: i32,
    pub hand_size: i32,
}

impl SideMetrics {
    pub fn of(player: &PlayerState) -> Self {
        let hero = &player.hero;
        let taunt_health: i32 = player
            .board
            .iter()
            .filter(|m| m.stats.taunt)
            .map(|m| m.health())
            .sum();
        let board_offense: i32 = player.board.iter().map(estimated_attack).sum();

        SideMetrics {
            effective_health: hero.total_health() + taunt_health,
            offense: hero.stats.attack + board_offense,
            hand_size: player.hand_size() as i32,
        }
    }
}

/// Damage a minion threatens this turn
pub fn estimated_attack(minion: &Minion) -> i32 {
    let swings = if minion.stats.windfury { 2 } else { 1 };
    let active = if minion.stats.frozen { 0 } else { 1 };
    minion.attack() * swings * active
}

/// Compares positions for a fixed side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionComparator {
    side: PlayerId,
}

impl PositionComparator {
    pub fn new(side: PlayerId) -> Self {
        PositionComparator { side }
    }

    pub fn side(&self) -> PlayerId {
        self.side
    }

    /// (own, enemy) metrics of a state
    pub fn metrics(&self, state: &GameState) -> (SideMetrics, SideMetrics) {
        (
            SideMetrics::of(state.player(self.side)),
            SideMetrics::of(state.player(self.side.opponent())),
        )
    }

    /// Positive when `a` is better than `b` for this side, 0 when they are
    /// indistinguishable, negative when worse
    ///
    /// When only hand size changed the hand-size delta itself is returned;
    /// otherwise the result is +1 or -1.
    ///
    /// Not antisymmetric: when the weighted board delta is exactly zero,
    /// `compare(a, b)` and `compare(b, a)` are both -1.
    pub fn compare(&self, a: &GameState, b: &GameState) -> i32 {
        let (own_a, enemy_a) = self.metrics(a);
        let (own_b, enemy_b) = self.metrics(b);

        let own_health = own_a.effective_health - own_b.effective_health;
        let enemy_health = enemy_a.effective_health - enemy_b.effective_health;
        let own_offense = own_a.offense - own_b.offense;
        let enemy_offense = enemy_a.offense - enemy_b.offense;
        let hand = own_a.hand_size - own_b.hand_size;

        let board_unchanged = own_health == 0 && enemy_health == 0 && own_offense == 0 && enemy_offense == 0;
        if board_unchanged {
            // Covers the all-equal case too: hand is 0 then
            return hand;
        }

        let total = f64::from(own_health - enemy_health)
            + OFFENSE_WEIGHT * f64::from(own_offense)
            - OFFENSE_WEIGHT * f64::from(enemy_offense);
        if total > 0.0 {
            1
        } else {
            -1
        }
    }
}

/// Maximum element under `compare`; ties keep the earliest element
///
/// The running best is replaced only when `compare(best, candidate) < 0`.
pub fn best_of<T, I, F>(items: I, mut compare: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T, &T) -> i32,
{
    let mut best: Option<T> = None;
    for item in items {
        best = match best {
            Some(current) if compare(&current, &item) >= 0 => Some(current),
            _ => Some(item),
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        game.add_minion(PlayerId::One, "Yeti", 4, 5);
        game.add_minion(PlayerId::Two, "Raptor", 3, 2);
        game
    }

    #[test]
    fn test_identical_states_compare_zero() {
        let game = base();
        let cmp = PositionComparator::new(PlayerId::One);
        assert_eq!(cmp.compare(&game, &game.clone()), 0);
    }

    #[test]
    fn test_hand_size_only() {
        let game = base();
        let mut drawn = game.clone();
        let card = std::sync::Arc::new(crate::core::CardDescriptor::minion("Wisp", 0, 1, 1));
        drawn.add_to_hand(PlayerId::One, card.clone());
        drawn.add_to_hand(PlayerId::One, card);

        let cmp = PositionComparator::new(PlayerId::One);
        assert_eq!(cmp.compare(&drawn, &game), 2);
        assert_eq!(cmp.compare(&game, &drawn), -2);
    }

    #[test]
    fn test_killing_enemy_minion_is_better() {
        let game = base();
        let mut cleared = game.clone();
        cleared.player_mut(PlayerId::Two).board.clear();

        let cmp = PositionComparator::new(PlayerId::One);
        assert_eq!(cmp.compare(&cleared, &game), 1);
        assert_eq!(cmp.compare(&game, &cleared), -1);

        // The other side sees it the opposite way
        let theirs = PositionComparator::new(PlayerId::Two);
        assert_eq!(theirs.compare(&cleared, &game), -1);
    }

    #[test]
    fn test_zero_weighted_total_is_worse_both_ways() {
        let game = base();
        // Lose 3 effective health; the enemy loses 3 offense to a frozen Raptor
        let mut traded = game.clone();
        traded.player_mut(PlayerId::One).hero.stats.damage = 3;
        traded.player_mut(PlayerId::Two).board[0].stats.frozen = true;
        // own health -3, enemy offense -3: -3 + 1.5 * 3 = 1.5, still positive
        let cmp = PositionComparator::new(PlayerId::One);
        assert_eq!(cmp.compare(&traded, &game), 1);

        // Lose 3 effective health and 2 offense, enemy loses 3 health
        let mut even = game.clone();
        even.player_mut(PlayerId::One).hero.stats.damage = 3;
        even.player_mut(PlayerId::One).board[0].stats.attack = 2;
        even.player_mut(PlayerId::Two).hero.stats.damage = 3;
        // (-3 - -3) + 1.5 * -2 = -3; reverse: 0 + 1.5 * 2 = 3
        assert_eq!(cmp.compare(&even, &game), -1);
        assert_eq!(cmp.compare(&game, &even), 1);

        // Weighted total exactly zero: own offense -2 balanced by enemy health -3
        let mut zero = game.clone();
        zero.player_mut(PlayerId::One).board[0].stats.attack = 2;
        zero.player_mut(PlayerId::Two).hero.stats.damage = 3;
        // (0 - -3) + 1.5 * -2 = 0 and (0 - 3) + 1.5 * 2 = 0
        assert_eq!(cmp.compare(&zero, &game), -1);
        assert_eq!(cmp.compare(&game, &zero), -1);
    }

    #[test]
    fn test_metrics() {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        game.player_mut(PlayerId::One).hero.armor = 2;
        let id = game.next_id();
        game.player_mut(PlayerId::One)
            .board
            .push(Minion::new(id, PlayerId::One, "Wall", 1, 6).with_taunt().with_windfury());
        let id = game.next_id();
        game.player_mut(PlayerId::One)
            .board
            .push(Minion::new(id, PlayerId::One, "Iced", 5, 5).frozen());

        let (own, enemy) = PositionComparator::new(PlayerId::One).metrics(&game);
        assert_eq!(own.effective_health, 38);
        assert_eq!(own.offense, 2);
        assert_eq!(enemy.effective_health, 30);
        assert_eq!(enemy.offense, 0);
    }

    #[test]
    fn test_best_of_keeps_earliest_tie() {
        let items = vec![(0, 3), (1, 5), (2, 5), (3, 1)];
        let best = best_of(items, |a, b| a.1 - b.1);
        assert_eq!(best, Some((1, 5)));
        let empty: Vec<(i32, i32)> = Vec::new();
        assert_eq!(best_of(empty, |a, b| a.1 - b.1), None);
    }
}
