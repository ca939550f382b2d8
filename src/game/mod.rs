//! Game state, actions and the engine/agent boundary

pub mod actions;
pub mod controller;
pub mod engine;
pub mod logger;
pub mod state;

pub use actions::{find_matching, Action, TargetRef};
pub use controller::{Agent, GameView};
pub use engine::{card_play_actions, GameEngine};
pub use logger::{DecisionLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use state::{GameState, PlayerState, MAX_BOARD_SIZE, MAX_HAND_SIZE, MAX_MANA};
