//! tavern-ai - target validation and move planning for a turn-based card game
//!
//! The core is two subsystems: the target validation engine (`targeting`)
//! and the move planning engine (`ai`). Both read game state through the
//! types in `core` and `game` and reach the rules only through the
//! `GameEngine` trait. `sandbox`, `harness` and `tournament` are small
//! reference collaborators that let the core run whole matches.

pub mod ai;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod harness;
pub mod sandbox;
pub mod targeting;
pub mod tournament;

pub use error::{Result, TavernError};
