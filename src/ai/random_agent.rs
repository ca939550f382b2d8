//! Random agent
//!
//! Picks uniformly among the legal actions. Serves as a baseline for the
//! planner agents. The RNG is seeded so that matches replay exactly.

use crate::game::logger::log_choice;
use crate::game::{Action, Agent, GameView};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

pub struct RandomAgent {
    name: String,
    seed: u64,
    rng: ChaCha12Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            name: "random".to_string(),
            seed,
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, view: &GameView) -> Action {
        let options = view.legal_actions();
        let action = match options.choose(&mut self.rng) {
            Some(action) => action.clone(),
            None => Action::EndTurn {
                player: view.state().current,
            },
        };
        log_choice!(view.logger(), &self.name, "chose {}", action);
        action
    }

    fn initialize_agent(&mut self) {
        self.rng = ChaCha12Rng::seed_from_u64(self.seed);
    }
}
