//! Boundary to the rules engine
//!
//! The decision core never generates or resolves actions itself. It asks a
//! `GameEngine` for the legal actions in a state and for independent
//! simulated successor states.

use crate::game::{Action, GameState};
use crate::Result;

/// Rules engine consumed by agents and the match harness
pub trait GameEngine {
    /// Ordered list of legal actions for the player whose turn it is
    fn legal_actions(&self, state: &GameState) -> Vec<Action>;

    /// Resolve one action against a copy of `state`
    ///
    /// `state` itself is never modified.
    fn apply(&self, state: &GameState, action: &Action) -> Result<GameState>;

    /// Simulate each action independently from `state`
    ///
    /// Output order follows `actions`. A `None` entry means the action could
    /// not be simulated; callers discard it.
    fn simulate(&self, state: &GameState, actions: &[Action]) -> Vec<(Action, Option<GameState>)> {
        actions
            .iter()
            .map(|action| (action.clone(), self.apply(state, action).ok()))
            .collect()
    }
}

/// Card plays and hero powers offered in `state`
pub fn card_play_actions(engine: &dyn GameEngine, state: &GameState) -> Vec<Action> {
    engine
        .legal_actions(state)
        .into_iter()
        .filter(Action::is_card_play)
        .collect()
}
