//! Planner scenarios on the sandbox engine
//!
//! Position comparison, attack assignment and lookahead scheduling driven
//! through real legal actions instead of hand-built engines.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use similar_asserts::assert_eq;
use tavern_ai::ai::{
    group_by_attacker, search, AttackAssignmentSolver, CardSelector, LookaheadScheduler, PositionComparator,
    SearchBudget,
};
use tavern_ai::core::{EntityId, PlayerId};
use tavern_ai::game::{card_play_actions, Action, DecisionLogger, GameEngine, GameState, GameView, TargetRef};
use tavern_ai::sandbox::{CardPool, SandboxEngine};
use tavern_ai::tournament::MatchSetup;

fn attack(state: &GameState, attacker: EntityId, target: EntityId) -> Action {
    let source = state.character(attacker).unwrap();
    Action::MinionAttack {
        player: source.controller(),
        attacker,
        name: source.name().into(),
        target: TargetRef::from(state.character(target).unwrap()),
    }
}

/// Player one with ten mana and the named cards in hand, empty boards
fn hand_of(cards: &[&str]) -> GameState {
    let pool = CardPool::standard();
    let mut state = GameState::new_two_player("Alice", "Bob", 30);
    let me = state.player_mut(PlayerId::One);
    me.mana = 10;
    me.max_mana = 10;
    for name in cards {
        state.add_to_hand(PlayerId::One, pool.get(name).unwrap());
    }
    state
}

#[test]
fn test_compare_identical_copies_is_zero() {
    let pool = CardPool::standard();
    let setup = MatchSetup::new(&pool, "aggro", "dragons", 30).unwrap();
    let engine = SandboxEngine;
    let mut state = setup.new_game(11);

    // Walk a game taking the last legal action each time
    for _ in 0..60 {
        for side in [PlayerId::One, PlayerId::Two] {
            let cmp = PositionComparator::new(side);
            assert_eq!(cmp.compare(&state, &state.clone()), 0);
        }
        let actions = engine.legal_actions(&state);
        let Some(action) = actions.last() else {
            break;
        };
        state = engine.apply(&state, action).unwrap();
    }
}

#[test]
fn test_solver_never_below_default_assignment() {
    let mut rng = ChaCha12Rng::seed_from_u64(2024);
    for _ in 0..200 {
        let mut state = GameState::new_two_player("Alice", "Bob", 30);
        for (player, count) in [(PlayerId::One, rng.gen_range(1..=4)), (PlayerId::Two, rng.gen_range(1..=5))] {
            for _ in 0..count {
                let attack = rng.gen_range(1..=6);
                let health = rng.gen_range(1..=6);
                state.add_minion(player, "Token", attack, health);
            }
        }

        let attacks: Vec<Action> = SandboxEngine
            .legal_actions(&state)
            .into_iter()
            .filter(|a| matches!(a, Action::MinionAttack { .. }))
            .collect();
        let groups = group_by_attacker(&attacks);
        let solver = AttackAssignmentSolver::new(&state);
        let default_value = solver.score(&groups, &vec![0; groups.len()]);
        let assignment = solver.assign(&groups);

        assert!(assignment.value >= default_value);
        assert_eq!(assignment.value, solver.score(&groups, &assignment.choices));
    }
}

#[test]
fn test_two_attacker_assignment() {
    let mut state = GameState::new_two_player("Alice", "Bob", 30);
    let a = state.add_minion(PlayerId::One, "Attacker A", 4, 5);
    let b = state.add_minion(PlayerId::One, "Attacker B", 2, 5);
    let big = state.add_minion(PlayerId::Two, "Big", 6, 5);
    let small = state.add_minion(PlayerId::Two, "Small", 2, 3);

    let attacks = vec![
        attack(&state, a, big),
        attack(&state, a, small),
        attack(&state, b, big),
        attack(&state, b, small),
    ];
    let groups = group_by_attacker(&attacks);
    let solver = AttackAssignmentSolver::new(&state);
    let assignment = solver.assign(&groups);

    // A moves to the health-3 minion; B kills nothing either way and stays
    assert_eq!(assignment.choices, vec![1, 0]);
    assert_eq!(assignment.value, 2);
    assert_eq!(solver.solve(&attacks), Some(attack(&state, a, small)));
}

#[test]
fn test_zero_budget_returns_only_the_base() {
    let state = hand_of(&["Chillwind Yeti", "Bloodfen Raptor"]);
    let candidates = card_play_actions(&SandboxEngine, &state);
    assert_eq!(candidates.len(), 2);
    let cmp = PositionComparator::new(PlayerId::One);

    for mut budget in [SearchBudget::nodes(0), SearchBudget::wall_clock(std::time::Duration::ZERO)] {
        let outcomes = search(&SandboxEngine, &state, &candidates, &cmp, &mut budget);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].plan.is_empty());
        assert_eq!(outcomes[0].state, state);

        let logger = DecisionLogger::silent();
        let view = GameView::new(&state, &SandboxEngine, &logger);
        let mut scheduler = LookaheadScheduler::new();
        scheduler.schedule(&candidates, &view, &mut budget);
        assert!(scheduler.plan().is_empty());
        assert_eq!(scheduler.best_card(&candidates, &view, &mut budget), None);
    }
}

#[test]
fn test_schedule_plans_both_minions() {
    let state = hand_of(&["Chillwind Yeti", "Bloodfen Raptor"]);
    let candidates = card_play_actions(&SandboxEngine, &state);
    let logger = DecisionLogger::silent();
    let view = GameView::new(&state, &SandboxEngine, &logger);
    let mut scheduler = LookaheadScheduler::new();

    scheduler.schedule(&candidates, &view, &mut SearchBudget::nodes(100));
    assert_eq!(scheduler.plan().len(), 2);
    // Equal outcomes keep the first candidate's line
    assert_eq!(scheduler.plan()[0], candidates[0]);
}

#[test]
fn test_stale_plan_is_rescheduled() {
    let state = hand_of(&["Chillwind Yeti", "Bloodfen Raptor", "Boulderfist Ogre"]);
    let candidates = card_play_actions(&SandboxEngine, &state);
    let logger = DecisionLogger::silent();
    let mut budget = SearchBudget::nodes(1_000);
    let mut scheduler = LookaheadScheduler::new();
    {
        let view = GameView::new(&state, &SandboxEngine, &logger);
        scheduler.schedule(&candidates, &view, &mut budget);
    }
    let stale = scheduler.plan().front().cloned().unwrap();

    // The planned card leaves the hand before the next decision
    let mut changed = state.clone();
    let planned = stale.source().unwrap();
    changed.player_mut(PlayerId::One).hand.retain(|p| p.id != planned);
    let offered = card_play_actions(&SandboxEngine, &changed);
    assert!(offered.iter().all(|a| !a.matches(&stale)));

    budget.restart();
    let view = GameView::new(&changed, &SandboxEngine, &logger);
    let chosen = scheduler.best_card(&offered, &view, &mut budget).unwrap();
    assert!(offered.contains(&chosen));
    assert!(scheduler.plan().iter().all(|a| !a.matches(&stale)));
    assert!(scheduler.plan().iter().all(|a| offered.iter().any(|o| o.matches(a))));
}
