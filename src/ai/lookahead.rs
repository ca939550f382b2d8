//! Card-play selection: single-ply and budgeted lookahead
//!
//! Both selectors answer the same question: which card play (or hero
//! power) should be made now, if any. The single-ply selector simulates
//! each candidate once. The lookahead scheduler searches sequences of card
//! plays under a `SearchBudget` and keeps the best sequence as a plan that
//! later decisions consume one action at a time.

use crate::ai::comparator::{best_of, PositionComparator};
use crate::game::logger::log_verbose;
use crate::game::{card_play_actions, find_matching, Action, GameEngine, GameState, GameView};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Cooperative cutoff for the lookahead search
///
/// Checked when an expansion starts; an expansion in progress is never
/// interrupted.
#[derive(Debug, Clone)]
pub enum SearchBudget {
    /// Time measured from the start of the player's turn
    WallClock { started: Instant, limit: Duration },
    /// Maximum number of expansions (deterministic)
    Nodes { used: u64, limit: u64 },
}

impl SearchBudget {
    pub fn wall_clock(limit: Duration) -> Self {
        SearchBudget::WallClock {
            started: Instant::now(),
            limit,
        }
    }

    pub fn nodes(limit: u64) -> Self {
        SearchBudget::Nodes { used: 0, limit }
    }

    /// Start a new turn's budget
    pub fn restart(&mut self) {
        match self {
            SearchBudget::WallClock { started, .. } => *started = Instant::now(),
            SearchBudget::Nodes { used, .. } => *used = 0,
        }
    }

    pub fn has_remaining(&self) -> bool {
        match self {
            SearchBudget::WallClock { started, limit } => started.elapsed() < *limit,
            SearchBudget::Nodes { used, limit } => used < limit,
        }
    }

    /// Record one expansion
    pub fn charge(&mut self) {
        if let SearchBudget::Nodes { used, .. } = self {
            *used += 1;
        }
    }

    /// How far a wall-clock budget has been overrun
    pub fn overrun(&self) -> Option<Duration> {
        match self {
            SearchBudget::WallClock { started, limit } => started.elapsed().checked_sub(*limit).filter(|d| !d.is_zero()),
            SearchBudget::Nodes { .. } => None,
        }
    }
}

/// A searched sequence of card plays and the state it leads to
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub plan: Vec<Action>,
    pub state: GameState,
}

/// Chooses a card play (or hero power) to make now
pub trait CardSelector {
    /// Short name used in logs and agent names
    fn name(&self) -> &str;

    /// The card play to make, or None to move on to attacks
    fn best_card(&mut self, candidates: &[Action], view: &GameView, budget: &mut SearchBudget) -> Option<Action>;

    /// Drop any state carried between decisions
    fn reset(&mut self) {}
}

/// Simulate every candidate once and play the best if it is no worse
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePlySelector;

impl CardSelector for SinglePlySelector {
    fn name(&self) -> &str {
        "balance"
    }

    fn best_card(&mut self, candidates: &[Action], view: &GameView, _budget: &mut SearchBudget) -> Option<Action> {
        if candidates.is_empty() {
            return None;
        }
        let current = view.state();
        let cmp = PositionComparator::new(current.current);

        let simulated = view
            .simulate(candidates)
            .into_iter()
            .filter_map(|(action, state)| state.map(|s| (action, s)));
        let (action, best) = best_of(simulated, |a, b| cmp.compare(&a.1, &b.1))?;

        if cmp.compare(&best, current) >= 0 {
            Some(action)
        } else {
            None
        }
    }
}

/// Depth-first search over card-play sequences from `state`
///
/// The first outcome is always the empty plan at `state`. While budget
/// remains, each candidate whose simulated state is strictly better than
/// `state` is expanded further, and the best continuation below it is
/// added with the candidate prepended.
pub fn search(
    engine: &dyn GameEngine,
    state: &GameState,
    candidates: &[Action],
    cmp: &PositionComparator,
    budget: &mut SearchBudget,
) -> Vec<SearchOutcome> {
    let mut outcomes = vec![SearchOutcome {
        plan: Vec::new(),
        state: state.clone(),
    }];
    if candidates.is_empty() || !budget.has_remaining() {
        return outcomes;
    }
    budget.charge();

    for (action, child) in engine.simulate(state, candidates) {
        let Some(child) = child else {
            continue;
        };
        if cmp.compare(&child, state) <= 0 {
            continue;
        }

        let next = card_play_actions(engine, &child);
        let deeper = search(engine, &child, &next, cmp, budget);
        if let Some(mut best) = best_of(deeper, |a, b| cmp.compare(&a.state, &b.state)) {
            best.plan.insert(0, action);
            outcomes.push(best);
        }
    }
    outcomes
}

/// Lookahead selector that keeps a plan between decisions
#[derive(Debug, Clone, Default)]
pub struct LookaheadScheduler {
    plan: VecDeque<Action>,
}

impl LookaheadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> &VecDeque<Action> {
        &self.plan
    }

    pub fn clear_plan(&mut self) {
        self.plan.clear();
    }

    /// Search from the view's state and keep the best non-empty plan that
    /// is no worse than the current position
    pub fn schedule(&mut self, candidates: &[Action], view: &GameView, budget: &mut SearchBudget) {
        let current = view.state();
        let cmp = PositionComparator::new(current.current);
        let outcomes = search(view.engine(), current, candidates, &cmp, budget);

        let Some(best) = best_of(outcomes, |a, b| cmp.compare(&a.state, &b.state)) else {
            return;
        };
        if !best.plan.is_empty() && cmp.compare(&best.state, current) >= 0 {
            log_verbose!(view.logger(), "scheduled plan of {} action(s)", best.plan.len());
            self.plan = best.plan.into();
        }
    }

    fn next_offered(&mut self, candidates: &[Action]) -> Option<Result<Action, Action>> {
        let next = self.plan.pop_front()?;
        Some(match find_matching(candidates, &next) {
            Some(offered) => Ok(offered.clone()),
            None => Err(next),
        })
    }
}

impl CardSelector for LookaheadScheduler {
    fn name(&self) -> &str {
        "depth"
    }

    /// Next planned action if it is still offered; otherwise discard the
    /// plan, schedule a fresh one and return its first action
    fn best_card(&mut self, candidates: &[Action], view: &GameView, budget: &mut SearchBudget) -> Option<Action> {
        if candidates.is_empty() {
            return None;
        }
        if self.plan.is_empty() {
            self.schedule(candidates, view, budget);
        }

        match self.next_offered(candidates)? {
            Ok(action) => Some(action),
            Err(stale) => {
                log_verbose!(view.logger(), "discarding stale plan at {}", stale);
                self.plan.clear();
                self.schedule(candidates, view, budget);
                match self.next_offered(candidates)? {
                    Ok(action) => Some(action),
                    Err(_) => {
                        self.plan.clear();
                        None
                    }
                }
            }
        }
    }

    fn reset(&mut self) {
        self.plan.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDescriptor, CardEffect, CardName, EntityId, PlayerId};
    use crate::game::DecisionLogger;
    use crate::{Result, TavernError};
    use std::cell::Cell;
    use std::sync::Arc;

    /// Every card in hand is playable for free and deals its damage to
    /// the enemy hero
    #[derive(Default)]
    struct BurnEngine {
        simulate_calls: Cell<usize>,
    }

    impl GameEngine for BurnEngine {
        fn legal_actions(&self, state: &GameState) -> Vec<Action> {
            let player = state.current_player();
            let mut actions = vec![Action::EndTurn { player: player.id }];
            actions.extend(player.hand.iter().map(|card| Action::PlayCard {
                player: player.id,
                card: card.id,
                name: card.card.name.clone(),
                target: None,
            }));
            actions
        }

        fn apply(&self, state: &GameState, action: &Action) -> Result<GameState> {
            let Action::PlayCard { card, .. } = action else {
                return Err(TavernError::InvalidAction(action.to_string()));
            };
            let mut next = state.clone();
            let me = next.current;
            let hand = &mut next.player_mut(me).hand;
            let pos = hand
                .iter()
                .position(|c| c.id == *card)
                .ok_or(TavernError::EntityNotFound(card.as_u32()))?;
            let played = hand.remove(pos);
            if let CardEffect::Damage(amount) = played.card.effect {
                next.player_mut(me.opponent()).hero.stats.damage += amount;
            }
            Ok(next)
        }

        fn simulate(&self, state: &GameState, actions: &[Action]) -> Vec<(Action, Option<GameState>)> {
            self.simulate_calls.set(self.simulate_calls.get() + 1);
            actions
                .iter()
                .map(|action| (action.clone(), self.apply(state, action).ok()))
                .collect()
        }
    }

    fn burn_game(damages: &[i32]) -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", 30);
        for (i, amount) in damages.iter().enumerate() {
            let card = CardDescriptor::spell(format!("Burn {}", i), 0, CardEffect::Damage(*amount));
            game.add_to_hand(PlayerId::One, Arc::new(card));
        }
        game
    }

    #[test]
    fn test_zero_budget_returns_only_base() {
        let engine = BurnEngine::default();
        let game = burn_game(&[2, 3]);
        let candidates = card_play_actions(&engine, &game);
        let cmp = PositionComparator::new(PlayerId::One);

        let outcomes = search(&engine, &game, &candidates, &cmp, &mut SearchBudget::nodes(0));
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].plan.is_empty());
        assert_eq!(outcomes[0].state, game);
        assert_eq!(engine.simulate_calls.get(), 0);

        let logger = DecisionLogger::silent();
        let view = GameView::new(&game, &engine, &logger);
        let mut scheduler = LookaheadScheduler::new();
        let mut budget = SearchBudget::wall_clock(Duration::ZERO);
        assert_eq!(scheduler.best_card(&candidates, &view, &mut budget), None);
        assert!(scheduler.plan().is_empty());
    }

    #[test]
    fn test_schedule_plays_every_card() {
        let engine = BurnEngine::default();
        let game = burn_game(&[2, 3]);
        let candidates = card_play_actions(&engine, &game);
        let logger = DecisionLogger::silent();
        let view = GameView::new(&game, &engine, &logger);

        let mut scheduler = LookaheadScheduler::new();
        let mut budget = SearchBudget::nodes(100);
        let first = scheduler.best_card(&candidates, &view, &mut budget);
        assert_eq!(first, Some(candidates[0].clone()));
        assert_eq!(scheduler.plan().len(), 1);
        assert!(scheduler.plan()[0].matches(&candidates[1]));
    }

    #[test]
    fn test_stale_plan_is_rescheduled() {
        let engine = BurnEngine::default();
        let game = burn_game(&[2, 3]);
        let candidates = card_play_actions(&engine, &game);
        let logger = DecisionLogger::silent();
        let mut scheduler = LookaheadScheduler::new();
        let mut budget = SearchBudget::nodes(100);

        let view = GameView::new(&game, &engine, &logger);
        scheduler.best_card(&candidates, &view, &mut budget);
        assert_eq!(scheduler.plan().len(), 1);

        // A different position where the planned card is gone
        let other = burn_game(&[4]);
        let fresh = card_play_actions(&engine, &other);
        let calls_before = engine.simulate_calls.get();
        let view = GameView::new(&other, &engine, &logger);
        let chosen = scheduler.best_card(&fresh, &view, &mut budget);

        assert!(engine.simulate_calls.get() > calls_before);
        assert_eq!(chosen, Some(fresh[0].clone()));
        assert!(scheduler.plan().is_empty());
    }

    #[test]
    fn test_single_ply_picks_biggest_burn() {
        let engine = BurnEngine::default();
        let game = burn_game(&[1, 5, 5]);
        let candidates = card_play_actions(&engine, &game);
        let logger = DecisionLogger::silent();
        let view = GameView::new(&game, &engine, &logger);

        let mut selector = SinglePlySelector;
        let chosen = selector.best_card(&candidates, &view, &mut SearchBudget::nodes(0));
        // Of the two equal 5-damage results the earlier one is kept
        assert_eq!(chosen, Some(candidates[1].clone()));
        assert_eq!(selector.best_card(&[], &view, &mut SearchBudget::nodes(0)), None);
    }

    /// A card play naming a card that is not in hand; applying it fails
    fn missing_card() -> Action {
        Action::PlayCard {
            player: PlayerId::One,
            card: EntityId::new(999),
            name: CardName::from("Vanished"),
            target: None,
        }
    }

    #[test]
    fn test_unsimulatable_candidates_are_skipped() {
        let engine = BurnEngine::default();
        let game = burn_game(&[2, 3]);
        let playable = card_play_actions(&engine, &game);
        let candidates = vec![missing_card(), playable[0].clone(), playable[1].clone()];
        let logger = DecisionLogger::silent();
        let view = GameView::new(&game, &engine, &logger);

        let mut selector = SinglePlySelector;
        let chosen = selector.best_card(&candidates, &view, &mut SearchBudget::nodes(0));
        assert_eq!(chosen, Some(playable[1].clone()));
        let only_missing = [missing_card()];
        assert_eq!(selector.best_card(&only_missing, &view, &mut SearchBudget::nodes(0)), None);

        let cmp = PositionComparator::new(PlayerId::One);
        let outcomes = search(&engine, &game, &candidates, &cmp, &mut SearchBudget::nodes(100));
        // The base plus one line per playable card
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes
            .iter()
            .all(|o| o.plan.iter().all(|a| !a.matches(&missing_card()))));

        let mut scheduler = LookaheadScheduler::new();
        let first = scheduler.best_card(&candidates, &view, &mut SearchBudget::nodes(100));
        assert_eq!(first, Some(playable[0].clone()));
        assert_eq!(scheduler.plan().len(), 1);
        assert!(scheduler.plan()[0].matches(&playable[1]));
    }

    #[test]
    fn test_node_budget_limits_depth() {
        let engine = BurnEngine::default();
        let game = burn_game(&[1, 1, 1]);
        let candidates = card_play_actions(&engine, &game);
        let cmp = PositionComparator::new(PlayerId::One);

        let outcomes = search(&engine, &game, &candidates, &cmp, &mut SearchBudget::nodes(1));
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[1..].iter().all(|o| o.plan.len() == 1));
        assert_eq!(engine.simulate_calls.get(), 1);
    }

    #[test]
    fn test_budget_restart() {
        let mut budget = SearchBudget::nodes(1);
        assert!(budget.has_remaining());
        budget.charge();
        assert!(!budget.has_remaining());
        budget.restart();
        assert!(budget.has_remaining());
        assert_eq!(budget.overrun(), None);
    }
}
