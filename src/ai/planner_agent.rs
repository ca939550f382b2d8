//! Planner-backed agent
//!
//! Owns a `MovePlanner` and the per-turn search budget. The budget restarts
//! on the first decision of each turn; a turn ends when the planner returns
//! `EndTurn`.

use crate::ai::lookahead::{CardSelector, LookaheadScheduler, SearchBudget, SinglePlySelector};
use crate::ai::planner::MovePlanner;
use crate::config::PlannerConfig;
use crate::game::logger::log_choice;
use crate::game::{Action, Agent, GameView};

pub struct PlannerAgent<S> {
    name: String,
    planner: MovePlanner<S>,
    budget: SearchBudget,
    new_turn: bool,
}

/// Planner with single-ply card selection
pub type BalanceAgent = PlannerAgent<SinglePlySelector>;

/// Planner with budgeted lookahead card selection
pub type DepthAgent = PlannerAgent<LookaheadScheduler>;

impl<S: CardSelector> PlannerAgent<S> {
    pub fn new(selector: S, config: PlannerConfig) -> Self {
        let name = selector.name().to_string();
        let budget = config.budget.to_budget();
        PlannerAgent {
            name,
            planner: MovePlanner::new(selector, config),
            budget,
            new_turn: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn planner(&self) -> &MovePlanner<S> {
        &self.planner
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    fn reset(&mut self) {
        self.planner.selector_mut().reset();
        self.budget = self.planner.config().budget.to_budget();
        self.new_turn = true;
    }
}

impl BalanceAgent {
    pub fn balance(config: PlannerConfig) -> Self {
        PlannerAgent::new(SinglePlySelector, config)
    }
}

impl DepthAgent {
    pub fn depth(config: PlannerConfig) -> Self {
        PlannerAgent::new(LookaheadScheduler::new(), config)
    }
}

impl<S: CardSelector> Agent for PlannerAgent<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, view: &GameView) -> Action {
        if self.new_turn {
            self.new_turn = false;
            self.budget.restart();
        }

        let options = view.legal_actions();
        let action = self.planner.plan_move(view, &options, &mut self.budget);
        log_choice!(view.logger(), &self.name, "chose {}", action);

        if action.is_end_turn() {
            if let Some(over) = self.budget.overrun() {
                view.logger()
                    .normal(&format!("{}: exceeded turn budget by {:.2?}", self.name, over));
            }
            self.new_turn = true;
        }
        action
    }

    fn initialize_game(&mut self) {
        self.reset();
    }

    fn finalize_game(&mut self) {
        self.reset();
    }

    fn finalize_agent(&mut self) {
        self.reset();
    }
}
