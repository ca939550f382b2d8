//! Agent trait and game view
//!
//! This module defines the interface between the match harness and agents.
//! The harness calls the agent when a move is needed, and the agent inspects
//! a read-only view of the game (state, engine and logger) to choose it.

use crate::game::{Action, DecisionLogger, GameEngine, GameState};

/// Read-only view of the game for agents
///
/// Agents may simulate through the engine but cannot change the live state.
pub struct GameView<'a> {
    state: &'a GameState,
    engine: &'a dyn GameEngine,
    logger: &'a DecisionLogger,
}

impl<'a> GameView<'a> {
    pub fn new(state: &'a GameState, engine: &'a dyn GameEngine, logger: &'a DecisionLogger) -> Self {
        GameView { state, engine, logger }
    }

    pub fn state(&self) -> &'a GameState {
        self.state
    }

    pub fn engine(&self) -> &'a dyn GameEngine {
        self.engine
    }

    pub fn logger(&self) -> &'a DecisionLogger {
        self.logger
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        self.engine.legal_actions(self.state)
    }

    pub fn simulate(&self, actions: &[Action]) -> Vec<(Action, Option<GameState>)> {
        self.engine.simulate(self.state, actions)
    }
}

/// A player that picks one action per decision point
///
/// The lifecycle hooks default to no-ops; agents with state that must not
/// leak between games (plans, budgets, RNGs) override them.
pub trait Agent {
    /// Short name used in logs and statistics
    fn name(&self) -> &str;

    /// Choose the next action for the player whose turn it is
    fn get_move(&mut self, view: &GameView) -> Action;

    /// Called once before the first game
    fn initialize_agent(&mut self) {}

    /// Called once after the last game
    fn finalize_agent(&mut self) {}

    /// Called before each game
    fn initialize_game(&mut self) {}

    /// Called after each completed game
    fn finalize_game(&mut self) {}
}
